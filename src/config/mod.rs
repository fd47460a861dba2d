// Configuration module entry point
// Loads layered configuration and compiles the router policy

mod policy;
mod state;
mod types;

use std::net::SocketAddr;
use thiserror::Error;

// Re-export public types
pub use policy::{AssetCachePolicy, CorsPolicy, EndpointPaths, RouterPolicy};
pub use state::AppState;
pub use types::{
    CacheConfig, Config, CorsConfig, HandoffConfig, HeaderEntry, HealthConfig, LoggingConfig,
    MissingAssetPolicy, PerformanceConfig, RouterConfig, ServerConfig, StorageConfig,
};

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),
    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
    #[error("invalid listen address '{addr}': {source}")]
    Address {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional; `EDGE_`-prefixed environment variables override it,
    /// with `__` separating nested keys (`EDGE_SERVER__PORT=9000`).
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(config_path).required(false))
            .add_source(
                ::config::Environment::with_prefix("EDGE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("storage.root", "dist")?
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section that can be checked without touching the network or disk
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = match RouterPolicy::from_config(self) {
            Ok(_) => Vec::new(),
            Err(problems) => problems,
        };
        if crate::logger::LogLevel::parse(&self.logging.level).is_none() {
            problems.push(format!(
                "logging.level must be one of error, warn, info, debug; got '{}'",
                self.logging.level
            ));
        }
        if self.server.workers == Some(0) {
            problems.push("server.workers must be greater than zero".to_string());
        }
        if self.storage.root.trim().is_empty() {
            problems.push("storage.root must not be empty".to_string());
        }
        if let Err(e) = self.get_socket_addr() {
            problems.push(e.to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|source| ConfigError::Address { addr, source })
    }
}
