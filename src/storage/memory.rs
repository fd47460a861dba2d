// In-memory asset store

use std::collections::HashMap;

use super::{StorageError, StoredAsset};
use hyper::body::Bytes;

/// Assets held in a map keyed by path relative to the storage root.
///
/// Can be switched into a faulty state to simulate an unreachable or broken store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    assets: HashMap<String, StoredAsset>,
    fault: Option<Fault>,
}

#[derive(Debug, Clone)]
enum Fault {
    Unavailable(String),
    Panic(String),
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_asset(mut self, key: &str, body: impl Into<Bytes>) -> Self {
        self.insert(key, StoredAsset::new(body));
        self
    }

    #[must_use]
    pub fn with_typed_asset(mut self, key: &str, body: impl Into<Bytes>, content_type: &str) -> Self {
        self.insert(key, StoredAsset::new(body).with_content_type(content_type));
        self
    }

    /// Make every fetch fail with the given reason
    #[must_use]
    pub fn unavailable(mut self, reason: &str) -> Self {
        self.fault = Some(Fault::Unavailable(reason.to_string()));
        self
    }

    /// Make every fetch panic with the given message
    #[must_use]
    pub fn panicking(mut self, message: &str) -> Self {
        self.fault = Some(Fault::Panic(message.to_string()));
        self
    }

    pub fn insert(&mut self, key: &str, asset: StoredAsset) {
        self.assets
            .insert(key.trim_start_matches('/').to_string(), asset);
    }

    pub fn remove(&mut self, key: &str) -> Option<StoredAsset> {
        self.assets.remove(key.trim_start_matches('/'))
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub(super) fn fetch(&self, key: &str) -> Result<Option<StoredAsset>, StorageError> {
        match &self.fault {
            Some(Fault::Unavailable(reason)) => Err(StorageError::Unavailable(reason.clone())),
            Some(Fault::Panic(message)) => panic!("{message}"),
            None => Ok(self.assets.get(key).cloned()),
        }
    }
}
