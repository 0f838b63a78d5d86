// Connection handling module
// Serves one TCP connection with hyper on its own task

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use static_serve::config::PerformanceConfig;
use static_serve::host::{self, HostState};
use static_serve::logger;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct ConnectionSettings {
    pub keep_alive: bool,
    /// Limit for receiving a request head; bodies are not timed so throttled
    /// transfers can run as long as their rate requires
    pub header_read_timeout: Duration,
}

impl From<&PerformanceConfig> for ConnectionSettings {
    fn from(performance: &PerformanceConfig) -> Self {
        Self {
            keep_alive: performance.keep_alive_timeout > 0,
            header_read_timeout: Duration::from_secs(performance.read_timeout),
        }
    }
}

/// Handle a single connection in a spawned task.
pub fn serve_connection(
    stream: tokio::net::TcpStream,
    state: Arc<HostState>,
    settings: ConnectionSettings,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder
            .keep_alive(settings.keep_alive)
            .timer(TokioTimer::new())
            .header_read_timeout(settings.header_read_timeout);

        let conn = builder.serve_connection(
            io,
            service_fn(move |req| host::handle_request(req, Arc::clone(&state))),
        );

        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }
    });
}
