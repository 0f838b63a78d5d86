// Configuration module entry point
// Loads server, logging and file-serving settings

mod types;

use std::net::SocketAddr;

pub use types::{Config, FilesConfig, LoggingConfig, PerformanceConfig, ServerConfig};

impl Config {
    /// Load configuration from a file path, extension optional
    /// A missing file is not an error; defaults and `SERVER_*` variables still apply
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("SERVER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.enabled", false)?
            .set_default("logging.access_log", true)?
            .set_default("files.root", ".")?
            .set_default("files.server_name", env!("CARGO_PKG_NAME"))?
            .set_default("files.server_url", "https://github.com/")?
            .set_default("files.conditional", "exact")?
            .set_default("files.throttle_files", Vec::<String>::new())?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .build()?;

        settings.try_deserialize()
    }

    /// Load from `config.toml` in the working directory
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ConditionalMode;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("/nonexistent/static_serve_config").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.files.root, ".");
        assert_eq!(cfg.files.conditional, ConditionalMode::Exact);
        assert!(cfg.files.throttle_files.is_empty());
        assert!(!cfg.logging.enabled);
        assert_eq!(cfg.get_socket_addr().unwrap().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_load_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("serve.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 9090

[files]
root = "/srv/www"
conditional = "since"
throttle_files = ["/etc/throttles", "/etc/throttles.local"]
"#,
        )
        .unwrap();

        let cfg = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.files.root, "/srv/www");
        assert_eq!(cfg.files.conditional, ConditionalMode::Since);
        assert_eq!(cfg.files.throttle_files.len(), 2);
        // untouched sections keep their defaults
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.performance.keep_alive_timeout, 75);
    }
}
