use parking_lot::Mutex;

use crate::error::{NyimboError, Result};
use crate::types::{NewSheet, SheetId, SheetPatch, SheetRecord};

use super::{CatalogStore, sort_by_title, uploaded_by};

/// In-process document store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sheets: Mutex<Vec<SheetRecord>>,
    failure: Option<String>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheets(sheets: Vec<SheetRecord>) -> Self {
        Self {
            sheets: Mutex::new(sheets),
            ..Default::default()
        }
    }

    /// A store that serves `sheets` but refuses every write.
    pub fn read_only(sheets: Vec<SheetRecord>) -> Self {
        Self {
            sheets: Mutex::new(sheets),
            read_only: true,
            ..Default::default()
        }
    }

    /// A store whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Default::default()
        }
    }

    /// Insert or replace a document directly, bypassing id assignment.
    pub fn insert(&self, sheet: SheetRecord) {
        let mut sheets = self.sheets.lock();
        sheets.retain(|s| s.id != sheet.id);
        sheets.push(sheet);
    }

    pub fn len(&self) -> usize {
        self.sheets.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.lock().is_empty()
    }

    fn check(&self) -> Result<()> {
        match &self.failure {
            Some(message) => Err(NyimboError::Other(message.clone())),
            None => Ok(()),
        }
    }

    fn check_write(&self) -> Result<()> {
        self.check()?;
        if self.read_only {
            return Err(NyimboError::Other("music sheet store is read-only".to_string()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl CatalogStore for MemoryStore {
    async fn list_by_title(&self) -> Result<Vec<SheetRecord>> {
        self.check()?;
        let mut sheets = self.sheets.lock().clone();
        sort_by_title(&mut sheets);
        Ok(sheets)
    }

    async fn list_by_uploader(&self, user: &str) -> Result<Vec<SheetRecord>> {
        self.check()?;
        Ok(uploaded_by(&self.sheets.lock(), user))
    }

    async fn get(&self, id: &SheetId) -> Result<Option<SheetRecord>> {
        self.check()?;
        Ok(self.sheets.lock().iter().find(|s| &s.id == id).cloned())
    }

    async fn add(&self, sheet: NewSheet) -> Result<SheetRecord> {
        self.check_write()?;
        let record = sheet.into_record(SheetId::generate());
        self.sheets.lock().push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &SheetId, patch: SheetPatch) -> Result<()> {
        self.check_write()?;
        let mut sheets = self.sheets.lock();
        let record = sheets
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| NyimboError::SheetNotFound(id.to_string()))?;
        patch.apply(record);
        Ok(())
    }

    async fn delete(&self, id: &SheetId) -> Result<()> {
        self.check_write()?;
        let mut sheets = self.sheets.lock();
        let before = sheets.len();
        sheets.retain(|s| &s.id != id);
        if sheets.len() == before {
            return Err(NyimboError::SheetNotFound(id.to_string()));
        }
        Ok(())
    }
}
