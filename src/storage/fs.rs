// Directory-backed asset store
// Serves the SPA build output from disk, confined to the configured root

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::{StorageError, StoredAsset};
use crate::logger;

/// Assets read from a directory on every fetch
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub(super) async fn fetch(&self, key: &str) -> Result<Option<StoredAsset>, StorageError> {
        let root = match fs::canonicalize(&self.root).await {
            Ok(p) => p,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::Unavailable(format!(
                    "storage root '{}' does not exist",
                    self.root.display()
                )));
            }
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.root.display().to_string(),
                    source,
                });
            }
        };

        if key.is_empty() {
            return Ok(None);
        }

        // Missing files are the common case, no logging
        let Ok(file_path) = fs::canonicalize(root.join(key)).await else {
            return Ok(None);
        };
        if !file_path.starts_with(&root) {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {key} -> {}",
                file_path.display()
            ));
            return Ok(None);
        }

        match fs::metadata(&file_path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StorageError::Io {
                    path: file_path.display().to_string(),
                    source,
                });
            }
        }

        match fs::read(&file_path).await {
            Ok(body) => Ok(Some(StoredAsset::new(body))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                path: file_path.display().to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_dir(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "spa-edge-{name}-{}-{nanos}",
            std::process::id()
        ));
        std::fs::create_dir_all(dir.join("assets")).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_reads_files_under_root() {
        let dir = scratch_dir("read");
        std::fs::write(dir.join("index.html"), "<html></html>").unwrap();
        std::fs::write(dir.join("assets/app.js"), "let a = 1;").unwrap();

        let store = DirStore::new(&dir);
        let doc = store.fetch("index.html").await.unwrap().unwrap();
        assert_eq!(&doc.body[..], b"<html></html>");
        assert!(doc.content_type.is_none());
        let script = store.fetch("assets/app.js").await.unwrap().unwrap();
        assert_eq!(&script.body[..], b"let a = 1;");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_missing_and_directories_are_not_found() {
        let dir = scratch_dir("missing");
        let store = DirStore::new(&dir);
        assert!(store.fetch("logo.svg").await.unwrap().is_none());
        assert!(store.fetch("assets").await.unwrap().is_none());
        assert!(store.fetch("").await.unwrap().is_none());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_traversal_is_blocked() {
        let dir = scratch_dir("traversal");
        let outside = dir.with_extension("secret");
        std::fs::write(&outside, "secret").unwrap();
        let name = outside.file_name().unwrap().to_str().unwrap().to_string();

        let store = DirStore::new(dir.join("assets"));
        let key = format!("../../{name}");
        assert!(store.fetch(&key).await.unwrap().is_none());

        std::fs::remove_file(&outside).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_missing_root_is_unavailable() {
        let store = DirStore::new("/nonexistent/spa-edge-root");
        let err = store.fetch("index.html").await.unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)));
    }
}
