//! Document and object store collaborators
//!
//! The catalog never owns its data: sheet documents live in a document
//! store and the PDF files in an object store. Both sit behind traits so
//! the same flows run against a local directory, a REST endpoint, or an
//! in-process store in tests.

mod file;
mod http;
mod memory;
mod objects;
mod profiles;

use std::path::Path;

use serde_json::Value;

use crate::config::{Config, StoreKind};
use crate::error::Result;
use crate::types::{NewSheet, SheetId, SheetPatch, SheetRecord};

pub use file::FileStore;
pub use http::HttpStore;
pub use memory::MemoryStore;
pub use objects::{LocalObjectStore, MemoryObjectStore, ObjectStore};
pub use profiles::{FileProfileStore, MemoryProfileStore, ProfileStore};

/// The `music_sheets` document collection.
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// Every sheet, ordered ascending by title.
    ///
    /// The ordering is whatever the store's collation gives; callers must
    /// not re-sort.
    async fn list_by_title(&self) -> Result<Vec<SheetRecord>>;

    /// Sheets uploaded by `user`, newest first.
    async fn list_by_uploader(&self, user: &str) -> Result<Vec<SheetRecord>>;

    /// A single sheet, or `None` if no document has this id.
    async fn get(&self, id: &SheetId) -> Result<Option<SheetRecord>>;

    /// Add a document and return it with its assigned id.
    async fn add(&self, sheet: NewSheet) -> Result<SheetRecord>;

    /// Merge `patch` into an existing document.
    async fn update(&self, id: &SheetId, patch: SheetPatch) -> Result<()>;

    async fn delete(&self, id: &SheetId) -> Result<()>;
}

/// Order by title, byte-wise. Sheets without a title come first.
pub fn sort_by_title(sheets: &mut [SheetRecord]) {
    sheets.sort_by(|a, b| a.title.cmp(&b.title));
}

/// Order by upload time, newest first. Sheets without a timestamp go last.
pub fn sort_by_uploaded_desc(sheets: &mut [SheetRecord]) {
    sheets.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
}

/// Decode one stored document into a sheet.
///
/// Only JSON objects with a string `id` are sheets; anything else is
/// skipped with a warning naming `source`. Fields of the wrong shape are
/// degraded to absent by `SheetRecord` itself.
pub(crate) fn decode_sheet(doc: Value, source: &str) -> Option<SheetRecord> {
    if !doc.is_object() {
        tracing::warn!("Skipping non-object document in {source}");
        return None;
    }
    match serde_json::from_value::<SheetRecord>(doc) {
        Ok(sheet) => Some(sheet),
        Err(e) => {
            tracing::warn!("Skipping malformed document in {source}: {e}");
            None
        }
    }
}

/// Sheets owned by `user`, newest first.
pub(crate) fn uploaded_by(sheets: &[SheetRecord], user: &str) -> Vec<SheetRecord> {
    let mut owned: Vec<SheetRecord> = sheets
        .iter()
        .filter(|s| s.is_owned_by(user))
        .cloned()
        .collect();
    sort_by_uploaded_desc(&mut owned);
    owned
}

/// Document and object stores selected by configuration.
pub struct Backends {
    pub catalog: Box<dyn CatalogStore>,
    pub profiles: Box<dyn ProfileStore>,
    pub objects: Box<dyn ObjectStore>,
}

impl Backends {
    pub fn from_config(config: &Config, root: &Path) -> Result<Self> {
        let data_dir = config.data_dir(root);
        let (catalog, profiles): (Box<dyn CatalogStore>, Box<dyn ProfileStore>) =
            match config.store {
                StoreKind::File => (
                    Box::new(FileStore::new(&data_dir)),
                    Box::new(FileProfileStore::new(&data_dir)),
                ),
                StoreKind::Http => {
                    let store = HttpStore::from_config(config)?;
                    (Box::new(store.clone()), Box::new(store))
                }
            };
        let objects = Box::new(LocalObjectStore::new(data_dir.join("objects")));
        tracing::debug!(
            "Using {} catalog store, objects under {}",
            config.store,
            data_dir.display()
        );
        Ok(Self {
            catalog,
            profiles,
            objects,
        })
    }
}
