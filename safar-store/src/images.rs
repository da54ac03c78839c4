use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use safar_core::images::extension_for;
use safar_core::{StoreError, StoreResult};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::app_config::UploadsConfig;

/// Journey images kept on local disk and served back under `public_path`.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    dir: PathBuf,
    public_path: String,
}

impl LocalImageStore {
    pub fn new(dir: impl Into<PathBuf>, public_path: &str) -> Self {
        Self {
            dir: dir.into(),
            public_path: public_path.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &UploadsConfig) -> Self {
        Self::new(&config.dir, &config.public_path)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// URL prefix the stored files are served under, e.g. `/uploads`.
    pub fn public_path(&self) -> &str {
        &self.public_path
    }

    /// Writes the image under a fresh name and returns its public URL.
    pub async fn save(&self, bytes: &[u8], content_type: &str) -> StoreResult<String> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        let file_name = format!("{}.{}", Uuid::new_v4(), extension_for(content_type));
        tokio::fs::write(self.dir.join(&file_name), bytes)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        debug!(file = %file_name, size = bytes.len(), "Stored journey image");
        Ok(format!("{}/{}", self.public_path, file_name))
    }

    /// Deletes the file behind a URL produced by [`save`](Self::save).
    /// URLs that point elsewhere and files already gone are ignored.
    pub async fn remove(&self, url: &str) -> StoreResult<()> {
        let Some(file_name) = self.file_name_of(url) else {
            warn!(url, "Image URL is not managed by this store, skipping delete");
            return Ok(());
        };

        match tokio::fs::remove_file(self.dir.join(file_name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Storage(e.to_string())),
        }
    }

    fn file_name_of<'a>(&self, url: &'a str) -> Option<&'a str> {
        let name = url.strip_prefix(&self.public_path)?.strip_prefix('/')?;
        let plain = !name.is_empty()
            && !name.contains(['/', '\\'])
            && name != "."
            && name != "..";
        plain.then_some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_then_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path(), "/uploads/");

        let url = store.save(b"\x89PNG", "image/png").await.unwrap();
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with(".png"));

        let name = url.trim_start_matches("/uploads/");
        assert!(dir.path().join(name).exists());

        store.remove(&url).await.unwrap();
        assert!(!dir.path().join(name).exists());
        // second delete is a no-op
        store.remove(&url).await.unwrap();
    }

    #[tokio::test]
    async fn foreign_and_traversal_urls_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let keep = dir.path().join("keep.txt");
        std::fs::write(&keep, "x").unwrap();

        let store = LocalImageStore::new(dir.path().join("uploads"), "/uploads");
        store.remove("https://cdn.example.com/a.jpg").await.unwrap();
        store.remove("/uploads/../keep.txt").await.unwrap();
        store.remove("/uploads/..").await.unwrap();
        assert!(keep.exists());
    }
}
