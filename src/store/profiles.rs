use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::{Map, Value};
use tokio::fs;

use crate::error::Result;
use crate::types::{USERS_COLLECTION, UserProfile};

/// The `users` document collection, one profile per user id.
#[async_trait::async_trait]
pub trait ProfileStore: Send + Sync {
    /// The user's profile, or `None` if no document exists yet.
    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>>;

    /// Merge the set fields of `profile` into the user's document, creating
    /// it if needed.
    async fn merge_profile(&self, uid: &str, profile: &UserProfile) -> Result<()>;
}

/// Profiles kept in `<data_dir>/users.json` as an object keyed by user id.
///
/// Merges touch only the fields being set; anything else another writer
/// stored in a user's document is kept.
#[derive(Debug)]
pub struct FileProfileStore {
    path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl FileProfileStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(format!("{USERS_COLLECTION}.json")),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_documents(&self) -> Result<Map<String, Value>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    async fn write_documents(&self, documents: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(documents)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ProfileStore for FileProfileStore {
    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>> {
        let mut documents = self.read_documents().await?;
        let Some(doc) = documents.remove(uid) else {
            return Ok(None);
        };
        if !doc.is_object() {
            tracing::warn!("Ignoring non-object profile for {uid} in {}", self.path.display());
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(doc)?))
    }

    async fn merge_profile(&self, uid: &str, profile: &UserProfile) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut documents = self.read_documents().await?;
        let Value::Object(fields) = serde_json::to_value(profile)? else {
            return Ok(());
        };

        let doc = documents
            .entry(uid.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        match doc.as_object_mut() {
            Some(existing) => existing.extend(fields),
            None => *doc = Value::Object(fields),
        }
        self.write_documents(&documents).await
    }
}

/// In-process profile store.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: Mutex<HashMap<String, UserProfile>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>> {
        Ok(self.profiles.lock().get(uid).cloned())
    }

    async fn merge_profile(&self, uid: &str, profile: &UserProfile) -> Result<()> {
        let mut profiles = self.profiles.lock();
        let existing = profiles.entry(uid.to_string()).or_default();
        if let Some(url) = &profile.profile_pic_url {
            existing.profile_pic_url = Some(url.clone());
        }
        Ok(())
    }
}
