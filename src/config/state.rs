// Application state module
// Holds the configuration, compiled router policy and the shared storage handle

use std::sync::Arc;
use tokio::sync::Notify;

use super::policy::RouterPolicy;
use super::types::Config;
use super::ConfigError;
use crate::checkout::MessagingHandoff;
use crate::storage::Storage;

/// Application state, shared read-only by every connection
pub struct AppState {
    pub config: Config,
    pub policy: RouterPolicy,
    pub storage: Storage,
    /// Present when the messaging checkout endpoint is enabled
    pub handoff: Option<MessagingHandoff>,

    /// Notified once when the process should stop accepting connections
    pub shutdown: Arc<Notify>,
}

impl AppState {
    /// Build state around an already-initialized storage handle
    pub fn new(config: Config, storage: Storage) -> Result<Self, ConfigError> {
        let policy = RouterPolicy::from_config(&config).map_err(ConfigError::Invalid)?;
        let handoff = policy
            .endpoints
            .handoff
            .as_ref()
            .map(|_| MessagingHandoff::from_config(&config.handoff));

        Ok(Self {
            config,
            policy,
            storage,
            handoff,
            shutdown: Arc::new(Notify::new()),
        })
    }

    /// Build state with the directory storage named in the configuration
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let storage = Storage::open(&config.storage);
        Self::new(config, storage)
    }

    pub const fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }
}
