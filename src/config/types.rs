// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub performance: PerformanceConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub handoff: HandoffConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub workers: Option<usize>,
    /// Listen backlog queue size
    #[serde(default = "default_backlog")]
    pub backlog: i32,
}

#[allow(clippy::missing_const_for_fn)]
fn default_backlog() -> i32 {
    128
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: None,
            backlog: default_backlog(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Minimum level written to the error log (error, warn, info, debug)
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            access_log: true,
            access_log_format: default_access_log_format(),
            access_log_file: None,
            error_log_file: None,
        }
    }
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    /// Keep-alive switch: 0 disables keep-alive, any other value enables it
    pub keep_alive_timeout: u64,
    /// A connection, idle keep-alive time included, is closed after the
    /// larger of `read_timeout` and `write_timeout` seconds
    pub read_timeout: u64,
    pub write_timeout: u64,
    #[serde(default)]
    pub max_connections: Option<u64>,
    /// Seconds in-flight connections get to finish after a shutdown signal
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace: u64,
}

#[allow(clippy::missing_const_for_fn)]
fn default_shutdown_grace() -> u64 {
    10
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            keep_alive_timeout: 75,
            read_timeout: 30,
            write_timeout: 30,
            max_connections: None,
            shutdown_grace: default_shutdown_grace(),
        }
    }
}

/// Static asset storage configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    /// Directory holding the built SPA
    pub root: String,
    /// Root document returned for client-side routes, relative to `root`
    #[serde(default = "default_root_document")]
    pub root_document: String,
}

fn default_root_document() -> String {
    "index.html".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: "dist".to_string(),
            root_document: default_root_document(),
        }
    }
}

/// What to answer when an allow-listed asset is missing from storage
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissingAssetPolicy {
    /// Serve the root document, as for any client-side route
    #[default]
    SpaFallback,
    /// Answer 404
    NotFound,
}

/// Edge router configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RouterConfig {
    /// Extensions (without dot) served from storage instead of the root document
    #[serde(default = "default_asset_extensions")]
    pub asset_extensions: Vec<String>,
    #[serde(default)]
    pub missing_asset: MissingAssetPolicy,
    /// Put internal error messages into 500 bodies
    #[serde(default)]
    pub expose_error_details: bool,
    /// HTML page served when the root document is unavailable (plain text otherwise)
    #[serde(default)]
    pub fallback_page: Option<String>,
    /// Extension to content type overrides on top of the built-in table
    #[serde(default)]
    pub content_types: HashMap<String, String>,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    /// Headers attached to HTML document responses only
    #[serde(default = "default_security_headers")]
    pub security_headers: Vec<HeaderEntry>,
}

fn default_asset_extensions() -> Vec<String> {
    [
        "js", "css", "png", "jpg", "jpeg", "gif", "ico", "svg", "woff", "woff2", "ttf", "eot",
        "json", "webp",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

fn default_security_headers() -> Vec<HeaderEntry> {
    vec![
        HeaderEntry::new("X-Frame-Options", "DENY"),
        HeaderEntry::new("X-Content-Type-Options", "nosniff"),
        HeaderEntry::new("Referrer-Policy", "strict-origin-when-cross-origin"),
    ]
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            asset_extensions: default_asset_extensions(),
            missing_asset: MissingAssetPolicy::default(),
            expose_error_details: false,
            fallback_page: None,
            content_types: HashMap::new(),
            cors: CorsConfig::default(),
            cache: CacheConfig::default(),
            security_headers: default_security_headers(),
        }
    }
}

/// A single response header
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct HeaderEntry {
    pub name: String,
    pub value: String,
}

impl HeaderEntry {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// CORS configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CorsConfig {
    pub allow_origin: String,
    pub allow_methods: String,
    pub allow_headers: String,
    pub max_age: u64,
    /// Status of preflight answers (204 or 200)
    pub preflight_status: u16,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: "*".to_string(),
            allow_methods: "GET, POST, OPTIONS".to_string(),
            allow_headers: "Content-Type, Authorization".to_string(),
            max_age: 86400,
            preflight_status: 204,
        }
    }
}

/// Asset cache configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CacheConfig {
    /// Extensions always cached as immutable
    pub immutable_extensions: Vec<String>,
    /// Treat fingerprinted filenames (`app.3f2a.png`) as immutable
    pub hashed_filenames: bool,
    pub immutable_max_age: u32,
    /// max-age for every other asset
    pub asset_max_age: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            immutable_extensions: vec!["js".to_string(), "css".to_string()],
            hashed_filenames: true,
            immutable_max_age: 31_536_000,
            asset_max_age: 3600,
        }
    }
}

/// Health check configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HealthConfig {
    /// Enable health check endpoints
    #[serde(default = "default_health_enabled")]
    pub enabled: bool,
    /// Liveness probe path (default: /healthz)
    #[serde(default = "default_healthz_path")]
    pub liveness_path: String,
    /// Readiness probe path (default: /readyz)
    #[serde(default = "default_readyz_path")]
    pub readiness_path: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_health_enabled() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_healthz_path() -> String {
    "/healthz".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_readyz_path() -> String {
    "/readyz".to_string()
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: default_health_enabled(),
            liveness_path: default_healthz_path(),
            readiness_path: default_readyz_path(),
        }
    }
}

/// Messaging-app checkout handoff configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct HandoffConfig {
    pub enabled: bool,
    pub path: String,
    /// Number the prefilled message is addressed to; the endpoint stays off while empty
    pub contact_number: String,
    pub base_url: String,
    /// Client-side route showing the payment confirmation
    pub confirmation_path: String,
    /// Message text, `{service}` and `{amount}` are substituted
    pub message_template: String,
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/api/checkout/messaging".to_string(),
            contact_number: String::new(),
            base_url: "https://wa.me".to_string(),
            confirmation_path: "/confirmacion".to_string(),
            message_template: "Hello, I would like to pay for {service} ({amount}).".to_string(),
        }
    }
}
