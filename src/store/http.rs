use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::config::Config;
use crate::error::{NyimboError, Result};
use crate::types::{
    NewSheet, SHEETS_COLLECTION, SheetId, SheetPatch, SheetRecord, USERS_COLLECTION, UserProfile,
};

use super::{CatalogStore, ProfileStore, decode_sheet};

/// Document store reached over a REST collection endpoint.
///
/// Routes, relative to the configured base URL:
/// - `GET    /music_sheets?orderBy=title`
/// - `GET    /music_sheets?uploadedBy=<user>&orderBy=uploadedAt&direction=desc`
/// - `POST   /music_sheets`
/// - `GET | PATCH | DELETE /music_sheets/<id>`
/// - `GET | PATCH /users/<uid>` (PATCH merges fields)
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    base_url: String,
}

impl HttpStore {
    /// Configures the HTTP client with the configured request timeout.
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = config.store_url().ok_or_else(|| {
            NyimboError::Config(
                "http store selected but no URL configured. Set NYIMBO_STORE_URL or run: nyimbo config set http.base_url <url>".to_string(),
            )
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.http.timeout))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self::with_client(client, &base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.base_url, SHEETS_COLLECTION)
    }

    fn document_url(&self, id: &SheetId) -> String {
        format!("{}/{}", self.collection_url(), id)
    }

    fn profile_url(&self, uid: &str) -> String {
        format!("{}/{}/{}", self.base_url, USERS_COLLECTION, uid)
    }

    async fn fetch_list(&self, query: &[(&str, &str)]) -> Result<Vec<SheetRecord>> {
        let documents: Vec<Value> = self
            .client
            .get(self.collection_url())
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(decode_documents(documents))
    }
}

/// Decode documents one at a time so a single bad document cannot fail
/// the whole listing.
fn decode_documents(documents: Vec<Value>) -> Vec<SheetRecord> {
    documents
        .into_iter()
        .filter_map(|doc| decode_sheet(doc, SHEETS_COLLECTION))
        .collect()
}

#[async_trait::async_trait]
impl CatalogStore for HttpStore {
    async fn list_by_title(&self) -> Result<Vec<SheetRecord>> {
        tracing::debug!("Fetching catalog from {}", self.collection_url());
        self.fetch_list(&[("orderBy", "title")]).await
    }

    async fn list_by_uploader(&self, user: &str) -> Result<Vec<SheetRecord>> {
        self.fetch_list(&[
            ("uploadedBy", user),
            ("orderBy", "uploadedAt"),
            ("direction", "desc"),
        ])
        .await
    }

    async fn get(&self, id: &SheetId) -> Result<Option<SheetRecord>> {
        let response = self.client.get(self.document_url(id)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let sheet = response.error_for_status()?.json().await?;
        Ok(Some(sheet))
    }

    async fn add(&self, sheet: NewSheet) -> Result<SheetRecord> {
        let record = self
            .client
            .post(self.collection_url())
            .json(&sheet)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(record)
    }

    async fn update(&self, id: &SheetId, patch: SheetPatch) -> Result<()> {
        let response = self
            .client
            .patch(self.document_url(id))
            .json(&patch)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(NyimboError::SheetNotFound(id.to_string()));
        }
        response.error_for_status()?;
        Ok(())
    }

    async fn delete(&self, id: &SheetId) -> Result<()> {
        let response = self.client.delete(self.document_url(id)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(NyimboError::SheetNotFound(id.to_string()));
        }
        response.error_for_status()?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ProfileStore for HttpStore {
    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>> {
        let response = self.client.get(self.profile_url(uid)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let profile = response.error_for_status()?.json().await?;
        Ok(Some(profile))
    }

    async fn merge_profile(&self, uid: &str, profile: &UserProfile) -> Result<()> {
        self.client
            .patch(self.profile_url(uid))
            .json(profile)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
