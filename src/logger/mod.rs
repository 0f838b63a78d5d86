//! Logger module
//!
//! Provides logging utilities for the server on top of `tracing`:
//! - Subscriber installation from configuration
//! - Server lifecycle logging
//! - Access logging
//! - Serving decisions, warnings and errors

use crate::config::Config;
use hyper::{Method, StatusCode, Uri, Version};
use std::net::SocketAddr;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber
///
/// `RUST_LOG` takes precedence over `logging.level`. Should be called once
/// at application startup; a second call is ignored.
pub fn init(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!("======================================");
    tracing::info!("Static file server started");
    tracing::info!("Listening on: http://{addr}");
    tracing::info!("Document root: {}", config.files.root);
    tracing::info!("Log level: {}", config.logging.level);
    if let Some(workers) = config.server.workers {
        tracing::info!("Worker threads: {workers}");
    }
    if !config.files.throttle_files.is_empty() {
        tracing::info!("Throttle files: {}", config.files.throttle_files.join(", "));
    }
    tracing::info!("======================================");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!(peer = %peer_addr, "Connection accepted");
}

pub fn log_shutdown() {
    tracing::info!("Shutdown signal received, stopping accept loop");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}

pub fn log_request(method: &Method, uri: &Uri, version: Version) {
    tracing::info!("[Request] {method} {uri} {version:?}");
}

pub fn log_response(status: StatusCode, content_length: Option<u64>) {
    match content_length {
        Some(len) => tracing::info!("[Response] {} ({len} bytes)", status.as_u16()),
        None => tracing::info!("[Response] {}", status.as_u16()),
    }
}

pub fn log_throttles_loaded(path: &Path, count: usize) {
    tracing::info!("[Throttle] Loaded {count} rule(s) from {}", path.display());
}

/// Trace a serving decision, only when the file server has logging enabled
pub fn log_decision(enabled: bool, message: &str) {
    if enabled {
        tracing::debug!("[Files] {message}");
    }
}

pub fn log_transfer_failure(path: &Path, err: &impl std::fmt::Display) {
    tracing::warn!("[Files] Transfer of {} aborted: {err}", path.display());
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}
