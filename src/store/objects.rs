use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tokio::fs;

use crate::error::{NyimboError, Result};

/// Binary object storage for uploaded files.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key`, replacing any previous object.
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()>;

    /// URL a reader can use to download the object at `key`.
    async fn url_for(&self, key: &str) -> Result<String>;
}

/// Objects kept as files under a root directory, addressed by `file://` URLs.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve `key` under the root, refusing keys that would escape it.
    fn object_path(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let escapes = relative.is_absolute()
            || relative
                .components()
                .any(|c| !matches!(c, std::path::Component::Normal(_)));
        if key.is_empty() || escapes {
            return Err(NyimboError::Validation(format!("invalid object key '{key}'")));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait::async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        let path = self.object_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, bytes).await?;
        tracing::debug!("Stored object {} ({})", key, path.display());
        Ok(())
    }

    async fn url_for(&self, key: &str) -> Result<String> {
        let path = self.object_path(key)?;
        let absolute = fs::canonicalize(&path).await?;
        Ok(format!("file://{}", absolute.display()))
    }
}

/// In-process object store.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().get(key).cloned()
    }
}

#[async_trait::async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        self.objects.lock().insert(key.to_string(), bytes);
        Ok(())
    }

    async fn url_for(&self, key: &str) -> Result<String> {
        if !self.objects.lock().contains_key(key) {
            return Err(NyimboError::Other(format!("object '{key}' does not exist")));
        }
        Ok(format!("memory://{key}"))
    }
}
