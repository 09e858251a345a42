//! On-device key-value store
//!
//! Plays the role browser local storage plays for a web client: small
//! string values that outlive a session. Keys are hashed with SHA-256 and
//! files are laid out in a two-level directory structure.
//!
//! Example: key "draft" hashes to "8f2a…" and is stored at "local/8f/2a/8f2a…"

use crate::error::{AppError, Result};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Key-value store rooted at a directory
#[derive(Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Create the root directory if needed
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        tracing::info!("Local store initialized at: {:?}", self.root);
        Ok(())
    }

    /// Store a value, replacing any previous one
    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.get_path(key);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write to temp file first (atomic write)
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(value.as_bytes()).await?;
        file.sync_all().await?;

        fs::rename(temp_path, &path).await?;

        tracing::debug!("Stored local value ({} bytes)", value.len());
        Ok(())
    }

    /// Read a value, `None` when the key was never set or has been cleared
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.get_path(key);

        if !path.exists() {
            return Ok(None);
        }

        let value = fs::read_to_string(&path)
            .await
            .map_err(|e| AppError::LocalStore(format!("Failed to read value: {}", e)))?;

        Ok(Some(value))
    }

    pub async fn remove(&self, key: &str) -> Result<()> {
        let path = self.get_path(key);

        if path.exists() {
            fs::remove_file(&path).await?;
        }

        Ok(())
    }

    /// Drop every stored value
    pub async fn clear(&self) -> Result<()> {
        if self.root.exists() {
            fs::remove_dir_all(&self.root).await?;
        }
        fs::create_dir_all(&self.root).await?;

        tracing::info!("Local store cleared");
        Ok(())
    }

    /// Number of stored values
    pub async fn len(&self) -> Result<usize> {
        let mut count = 0;
        self.count_files(&self.root, &mut count).await?;
        Ok(count)
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    fn count_files<'a>(
        &'a self,
        dir: &'a Path,
        count: &'a mut usize,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            if !dir.exists() {
                return Ok(());
            }

            let mut entries = fs::read_dir(dir).await?;

            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();

                if path.is_dir() {
                    self.count_files(&path, count).await?;
                } else if path.is_file() && path.extension().is_none() {
                    *count += 1;
                }
            }

            Ok(())
        })
    }

    /// Get file path for a key
    fn get_path(&self, key: &str) -> PathBuf {
        let hash = Self::hash_key(key);
        self.root.join(&hash[0..2]).join(&hash[2..4]).join(&hash)
    }

    fn hash_key(key: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_store() -> (LocalStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalStore::new(temp_dir.path().join("local"));
        store.initialize().await.unwrap();
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let (store, _temp) = create_test_store().await;

        store.set("last_view", "map").await.unwrap();

        assert_eq!(store.get("last_view").await.unwrap().as_deref(), Some("map"));
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_overwrite() {
        let (store, _temp) = create_test_store().await;

        store.set("k", "one").await.unwrap();
        store.set("k", "two").await.unwrap();

        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("two"));
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_remove() {
        let (store, _temp) = create_test_store().await;

        store.set("k", "v").await.unwrap();
        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clear_wipes_everything() {
        let (store, _temp) = create_test_store().await;

        store.set("a", "1").await.unwrap();
        store.set("b", "2").await.unwrap();
        assert_eq!(store.len().await.unwrap(), 2);

        store.clear().await.unwrap();

        assert!(store.is_empty().await.unwrap());
        assert_eq!(store.get("a").await.unwrap(), None);
        assert!(store.root().exists());
    }

    #[tokio::test]
    async fn test_directory_structure() {
        let (store, _temp) = create_test_store().await;

        store.set("layout", "x").await.unwrap();

        let hash = LocalStore::hash_key("layout");
        let path = store.get_path("layout");
        assert!(path.exists());

        let parent = path.parent().unwrap();
        let grandparent = parent.parent().unwrap();
        assert_eq!(parent.file_name().unwrap(), &hash[2..4]);
        assert_eq!(grandparent.file_name().unwrap(), &hash[0..2]);
    }
}
