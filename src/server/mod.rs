// Server module entry point
// Accept loop for the bundled hyper host

mod connection;
mod listener;

pub use listener::create_reusable_listener;

use connection::ConnectionSettings;
use static_serve::config::PerformanceConfig;
use static_serve::host::HostState;
use static_serve::logger;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Accept connections until Ctrl-C
pub async fn run(listener: TcpListener, state: Arc<HostState>, performance: &PerformanceConfig) {
    let settings = ConnectionSettings::from(performance);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        logger::log_connection_accepted(&peer_addr);
                        connection::serve_connection(stream, Arc::clone(&state), settings);
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }
            _ = &mut shutdown => {
                logger::log_shutdown();
                return;
            }
        }
    }
}
