//! Static asset storage module
//!
//! The SPA build output is addressed by path relative to the storage root.
//! Two backends exist: a directory on disk for deployments and an in-memory
//! map used by tests and embedders. A fetch answers `Ok(None)` when the key is
//! absent and `Err` only when the store itself fails.

mod fs;
mod memory;

pub use fs::DirStore;
pub use memory::MemoryStore;

use crate::config::StorageConfig;
use crate::logger;
use hyper::body::Bytes;
use thiserror::Error;

/// An asset as returned by storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAsset {
    pub body: Bytes,
    /// Content type recorded by the store, if it keeps one
    pub content_type: Option<String>,
}

impl StoredAsset {
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            content_type: None,
        }
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = Some(content_type.to_string());
        self
    }
}

/// Storage failures other than "not found"
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Process-wide asset store, created once at startup and shared through `AppState`
#[derive(Debug)]
pub enum Storage {
    Dir(DirStore),
    Memory(MemoryStore),
}

impl Storage {
    /// Open the directory backend described by the configuration.
    ///
    /// A missing root is only warned about: the build output may be deployed
    /// after the server starts, and requests fail with 500 until it appears.
    pub fn open(config: &StorageConfig) -> Self {
        let store = DirStore::new(&config.root);
        if !store.root().is_dir() {
            logger::log_warning(&format!(
                "Storage root '{}' is not a directory yet",
                store.root().display()
            ));
        }
        Self::Dir(store)
    }

    pub const fn memory(store: MemoryStore) -> Self {
        Self::Memory(store)
    }

    /// Fetch an asset by request path or storage key
    pub async fn fetch(&self, key: &str) -> Result<Option<StoredAsset>, StorageError> {
        let key = key.trim_start_matches('/');
        match self {
            Self::Dir(store) => store.fetch(key).await,
            Self::Memory(store) => store.fetch(key),
        }
    }

    /// Human-readable location for startup logs
    pub fn describe(&self) -> String {
        match self {
            Self::Dir(store) => format!("directory {}", store.root().display()),
            Self::Memory(store) => format!("memory ({} assets)", store.len()),
        }
    }
}
