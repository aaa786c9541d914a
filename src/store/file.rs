use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tokio::fs;
use tokio::sync::Mutex;

use crate::error::{NyimboError, Result};
use crate::types::{NewSheet, SHEETS_COLLECTION, SheetId, SheetPatch, SheetRecord};

use super::{CatalogStore, decode_sheet, sort_by_title, uploaded_by};

/// Document store backed by one JSON file holding the whole collection.
///
/// Reads decode each document on its own: entries that are not objects or
/// have no id are skipped with a warning, and the rest still load. Writes
/// work on the raw documents, so fields this crate does not model, values
/// it could not decode and unreadable entries from other writers are kept
/// exactly as they were.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(format!("{SHEETS_COLLECTION}.json")),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_documents(&self) -> Result<Vec<Value>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    async fn read_all(&self) -> Result<Vec<SheetRecord>> {
        let source = self.path.display().to_string();
        let sheets = self
            .read_documents()
            .await?
            .into_iter()
            .filter_map(|doc| decode_sheet(doc, &source))
            .collect();
        Ok(sheets)
    }

    async fn write_documents(&self, documents: &[Value]) -> Result<()> {
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

fn has_id(doc: &Value, id: &SheetId) -> bool {
    doc.get("id").and_then(Value::as_str) == Some(id.as_str())
}

/// Set every field present in `patch` on `doc`, leaving the others alone.
fn merge_patch(doc: &mut Map<String, Value>, patch: &SheetPatch) -> Result<()> {
    if let Value::Object(fields) = serde_json::to_value(patch)? {
        doc.extend(fields);
    }
    Ok(())
}

#[async_trait::async_trait]
impl CatalogStore for FileStore {
    async fn list_by_title(&self) -> Result<Vec<SheetRecord>> {
        tracing::debug!("Reading catalog from {}", self.path.display());
        let mut sheets = self.read_all().await?;
        sort_by_title(&mut sheets);
        Ok(sheets)
    }

    async fn list_by_uploader(&self, user: &str) -> Result<Vec<SheetRecord>> {
        let sheets = self.read_all().await?;
        Ok(uploaded_by(&sheets, user))
    }

    async fn get(&self, id: &SheetId) -> Result<Option<SheetRecord>> {
        let sheets = self.read_all().await?;
        Ok(sheets.into_iter().find(|s| &s.id == id))
    }

    async fn add(&self, sheet: NewSheet) -> Result<SheetRecord> {
        let _guard = self.write_lock.lock().await;
        let mut documents = self.read_documents().await?;
        let record = sheet.into_record(SheetId::generate());
        documents.push(serde_json::to_value(&record)?);
        self.write_documents(&documents).await?;
        Ok(record)
    }

    async fn update(&self, id: &SheetId, patch: SheetPatch) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut documents = self.read_documents().await?;
        let doc = documents
            .iter_mut()
            .filter(|doc| has_id(doc, id))
            .find_map(Value::as_object_mut)
            .ok_or_else(|| NyimboError::SheetNotFound(id.to_string()))?;
        merge_patch(doc, &patch)?;
        self.write_documents(&documents).await
    }

    async fn delete(&self, id: &SheetId) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut documents = self.read_documents().await?;
        let before = documents.len();
        documents.retain(|doc| !has_id(doc, id));
        if documents.len() == before {
            return Err(NyimboError::SheetNotFound(id.to_string()));
        }
        self.write_documents(&documents).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use serde_json::json;
    use jiff::Timestamp;
    use tempfile::TempDir;

    fn new_sheet(title: &str, user: &str) -> NewSheet {
        NewSheet {
            title: title.to_string(),
            composer: "Kamau".to_string(),
            description: String::new(),
            category: Category::Communion,
            file_url: format!("file:///tmp/{title}.pdf"),
            file_name: format!("{title}.pdf"),
            uploaded_by: user.to_string(),
            uploaded_at: Timestamp::now(),
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_catalog() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.list_by_title().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_then_list_sorted() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        store.add(new_sheet("Wamukiri", "u1")).await.unwrap();
        store.add(new_sheet("Amen", "u1")).await.unwrap();

        let titles: Vec<String> = store
            .list_by_title()
            .await
            .unwrap()
            .iter()
            .map(|s| s.title_str().to_string())
            .collect();
        assert_eq!(titles, vec!["Amen", "Wamukiri"]);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let added = store.add(new_sheet("Amen", "u1")).await.unwrap();

        store
            .update(
                &added.id,
                SheetPatch {
                    title: Some("Amina".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let fetched = store.get(&added.id).await.unwrap().unwrap();
        assert_eq!(fetched.title.as_deref(), Some("Amina"));
        assert_eq!(fetched.composer.as_deref(), Some("Kamau"));

        store.delete(&added.id).await.unwrap();
        assert!(store.get(&added.id).await.unwrap().is_none());
        assert!(matches!(
            store.delete(&added.id).await,
            Err(NyimboError::SheetNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_documents_are_skipped_or_degraded() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        std::fs::write(
            store.path(),
            r#"[
                {"id": "a", "title": "Amen", "composer": "X"},
                {"title": "No id"},
                "not a document",
                ["c", "Array Title", "Y"],
                {"id": "b", "title": 7, "uploadedAt": "last week"}
            ]"#,
        )
        .unwrap();

        let sheets = store.list_by_title().await.unwrap();
        let ids: Vec<&str> = sheets.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(sheets[0].title, None);
        assert_eq!(sheets[0].uploaded_at, None);
    }

    #[tokio::test]
    async fn test_list_by_uploader() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        store.add(new_sheet("Mine", "u1")).await.unwrap();
        store.add(new_sheet("Theirs", "u2")).await.unwrap();

        let mine = store.list_by_uploader("u1").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].title_str(), "Mine");
    }

    fn seed_shared_collection(store: &FileStore) -> Vec<Value> {
        let documents = vec![
            json!({
                "id": "theirs",
                "title": "Amen",
                "composer": "X",
                "category": "Hymns (other writer)",
                "downloads": 12,
                "uploadedBy": "u2"
            }),
            json!({"title": "No id", "uploadedBy": "u2"}),
            json!(["not", "an", "object"]),
            json!({
                "id": "mine",
                "title": "Ngai Mwega",
                "composer": "Kamau",
                "description": "Lyrics",
                "uploadedBy": "u1",
                "likes": ["u3"]
            }),
        ];
        std::fs::write(store.path(), serde_json::to_string(&documents).unwrap()).unwrap();
        documents
    }

    fn stored_documents(store: &FileStore) -> Vec<Value> {
        let content = std::fs::read_to_string(store.path()).unwrap();
        serde_json::from_str(&content).unwrap()
    }

    #[tokio::test]
    async fn test_add_keeps_other_documents_intact() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let before = seed_shared_collection(&store);

        let added = store.add(new_sheet("Wamukiri", "u1")).await.unwrap();

        let after = stored_documents(&store);
        assert_eq!(after.len(), 5);
        for (old, new) in before.iter().zip(&after) {
            assert_eq!(
                serde_json::to_string(old).unwrap(),
                serde_json::to_string(new).unwrap()
            );
        }
        assert_eq!(after[4]["id"], added.id.as_str());
    }

    #[tokio::test]
    async fn test_update_merges_into_raw_document() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let before = seed_shared_collection(&store);

        store
            .update(
                &SheetId::new("mine"),
                SheetPatch {
                    title: Some("Ngai Mwega Muno".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let after = stored_documents(&store);
        assert_eq!(&after[..3], &before[..3]);
        assert_eq!(after[3]["title"], "Ngai Mwega Muno");
        assert_eq!(after[3]["composer"], "Kamau");
        assert_eq!(after[3]["likes"], json!(["u3"]));
    }

    #[tokio::test]
    async fn test_delete_removes_only_the_target() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let before = seed_shared_collection(&store);

        store.delete(&SheetId::new("mine")).await.unwrap();

        let after = stored_documents(&store);
        assert_eq!(after, before[..3].to_vec());
    }

    #[tokio::test]
    async fn test_foreign_fields_do_not_reach_search_records() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        seed_shared_collection(&store);

        let sheets = store.list_by_title().await.unwrap();
        let ids: Vec<&str> = sheets.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["theirs", "mine"]);
        assert_eq!(sheets[0].category, None);
    }
}
