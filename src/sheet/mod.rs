//! Upload, edit and delete flows for individual sheets.
//!
//! Every write checks the acting user against the sheet's `uploaded_by`
//! before touching the store. Files go to the object store under
//! `music_sheets/<file name>` and the document keeps the returned URL.

use std::path::{Path, PathBuf};

use jiff::Timestamp;

use crate::error::{NyimboError, Result};
use crate::store::{CatalogStore, ObjectStore};
use crate::types::{Category, NewSheet, SHEETS_COLLECTION, SheetId, SheetPatch, SheetRecord};

const REQUIRED_FIELDS: &str = "Please fill in all required fields and select a file.";
const ALL_FIELDS_REQUIRED: &str = "All fields are required";
const INVALID_PDF: &str = "Please select a valid PDF file.";

/// Form input for a new upload
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub title: String,
    pub composer: String,
    pub description: String,
    pub category: Option<Category>,
    pub file: Option<PathBuf>,
}

/// Form input for editing a sheet. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct EditRequest {
    pub title: Option<String>,
    pub composer: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    /// Replacement PDF
    pub file: Option<PathBuf>,
}

pub(crate) fn require_user<'a>(user: Option<&'a str>, action: &'static str) -> Result<&'a str> {
    user.filter(|u| !u.is_empty())
        .ok_or(NyimboError::NotLoggedIn(action))
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| NyimboError::Validation(INVALID_PDF.to_string()))
}

fn ensure_pdf(path: &Path) -> Result<()> {
    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
    if is_pdf {
        Ok(())
    } else {
        Err(NyimboError::Validation(INVALID_PDF.to_string()))
    }
}

/// Read a local PDF and put it in the object store. Returns `(url, file name)`.
async fn store_file<O>(objects: &O, path: &Path) -> Result<(String, String)>
where
    O: ObjectStore + ?Sized,
{
    ensure_pdf(path)?;
    let name = file_name(path)?;
    let bytes = tokio::fs::read(path).await?;
    let key = format!("{SHEETS_COLLECTION}/{name}");
    objects.put(&key, bytes).await?;
    let url = objects.url_for(&key).await?;
    Ok((url, name))
}

/// Upload a new sheet on behalf of `user`.
pub async fn upload_sheet<S, O>(
    store: &S,
    objects: &O,
    user: Option<&str>,
    request: UploadRequest,
) -> Result<SheetRecord>
where
    S: CatalogStore + ?Sized,
    O: ObjectStore + ?Sized,
{
    let user = require_user(user, "upload a music sheet")?;

    let title = request.title.trim();
    let composer = request.composer.trim();
    let (Some(category), Some(file)) = (request.category, request.file.as_deref()) else {
        return Err(NyimboError::Validation(REQUIRED_FIELDS.to_string()));
    };
    if title.is_empty() || composer.is_empty() {
        return Err(NyimboError::Validation(REQUIRED_FIELDS.to_string()));
    }

    let (file_url, file_name) = store_file(objects, file).await?;

    let record = store
        .add(NewSheet {
            title: title.to_string(),
            composer: composer.to_string(),
            description: request.description.trim().to_string(),
            category,
            file_url,
            file_name,
            uploaded_by: user.to_string(),
            uploaded_at: Timestamp::now(),
        })
        .await?;

    tracing::info!("Uploaded music sheet {} ({})", record.id, record.title_str());
    Ok(record)
}

/// Fetch a sheet or fail with `SheetNotFound`.
pub async fn get_sheet<S>(store: &S, id: &SheetId) -> Result<SheetRecord>
where
    S: CatalogStore + ?Sized,
{
    store
        .get(id)
        .await?
        .ok_or_else(|| NyimboError::SheetNotFound(id.to_string()))
}

async fn owned_sheet<S>(
    store: &S,
    id: &SheetId,
    user: &str,
    action: &'static str,
) -> Result<SheetRecord>
where
    S: CatalogStore + ?Sized,
{
    let sheet = get_sheet(store, id).await?;
    if !sheet.is_owned_by(user) {
        return Err(NyimboError::PermissionDenied(action));
    }
    Ok(sheet)
}

/// Apply an edit on behalf of `user`, who must own the sheet.
///
/// After merging the request with the stored values, title, composer and
/// description must all be non-empty.
pub async fn edit_sheet<S, O>(
    store: &S,
    objects: &O,
    user: Option<&str>,
    id: &SheetId,
    request: EditRequest,
) -> Result<SheetRecord>
where
    S: CatalogStore + ?Sized,
    O: ObjectStore + ?Sized,
{
    let user = require_user(user, "edit a music sheet")?;
    let current = owned_sheet(store, id, user, "edit").await?;

    let merged = |new: Option<String>, old: Option<&str>| -> String {
        new.as_deref().or(old).unwrap_or("").trim().to_string()
    };
    let title = merged(request.title, current.title.as_deref());
    let composer = merged(request.composer, current.composer.as_deref());
    let description = merged(request.description, current.description.as_deref());
    if title.is_empty() || composer.is_empty() || description.is_empty() {
        return Err(NyimboError::Validation(ALL_FIELDS_REQUIRED.to_string()));
    }

    let mut patch = SheetPatch {
        title: Some(title),
        composer: Some(composer),
        description: Some(description),
        category: request.category,
        updated_at: Some(Timestamp::now()),
        ..Default::default()
    };

    if let Some(file) = request.file.as_deref() {
        let (url, name) = store_file(objects, file).await?;
        patch.file_url = Some(url);
        patch.file_name = Some(name);
    }

    let replaced_file = patch.file_name.clone();
    let mut updated = current;
    patch.apply(&mut updated);
    if let Err(e) = store.update(id, patch).await {
        if let Some(name) = replaced_file {
            tracing::warn!(
                "Update of music sheet {id} failed after storing {SHEETS_COLLECTION}/{name}; \
                 the stored object is no longer referenced by this sheet: {e}"
            );
        }
        return Err(e);
    }

    tracing::info!("Updated music sheet {id}");
    Ok(updated)
}

/// Delete a sheet on behalf of `user`, who must own it.
pub async fn delete_sheet<S>(store: &S, user: Option<&str>, id: &SheetId) -> Result<()>
where
    S: CatalogStore + ?Sized,
{
    let user = require_user(user, "delete a music sheet")?;
    owned_sheet(store, id, user, "delete").await?;
    store.delete(id).await?;
    tracing::info!("Deleted music sheet {id}");
    Ok(())
}

/// The acting user's own sheets, newest first.
pub async fn user_sheets<S>(store: &S, user: Option<&str>) -> Result<Vec<SheetRecord>>
where
    S: CatalogStore + ?Sized,
{
    let user = require_user(user, "view your profile")?;
    store.list_by_uploader(user).await
}
