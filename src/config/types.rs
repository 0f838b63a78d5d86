// Configuration types module
// Defines all configuration-related data structures

use crate::http::ConditionalMode;
use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub files: FilesConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Filter directive, e.g. "info" or "static_serve=debug"
    pub level: String,
    /// Trace file-serving decisions (resolution, indexing, redirects)
    pub enabled: bool,
    pub access_log: bool,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    /// Seconds allowed for reading a request head
    pub read_timeout: u64,
}

/// File serving configuration
#[derive(Debug, Deserialize, Clone)]
pub struct FilesConfig {
    /// Document root that request paths are translated against
    pub root: String,
    /// Name shown in the directory listing footer
    pub server_name: String,
    /// Link target of the directory listing footer
    pub server_url: String,
    pub conditional: ConditionalMode,
    /// Throttle files, merged in order
    pub throttle_files: Vec<String>,
}
