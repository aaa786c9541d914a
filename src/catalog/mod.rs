//! In-memory catalog search index.
//!
//! The index reads the full catalog once, ordered by title, and answers
//! every later query from that snapshot. The snapshot is never refreshed;
//! build a new index to see changes made by other users.

pub mod filter;
pub mod letter;
pub mod state;

use std::sync::Arc;

use crate::error::{NyimboError, Result};
use crate::store::CatalogStore;
use crate::types::SheetRecord;

pub use filter::{filter_sheets, matches_letter, matches_search};
pub use letter::Letter;
pub use state::{SearchAction, SearchState, reduce_search_state};

/// A loaded catalog plus the user's current query and letter facet.
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    state: SearchState,
}

impl Default for CatalogIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogIndex {
    /// An index whose catalog read has not completed yet.
    pub fn new() -> Self {
        Self {
            state: SearchState::loading(),
        }
    }

    /// Read the catalog from `store` and build an index over it.
    ///
    /// A failed read does not fail construction: the index comes back with
    /// an empty corpus and `load_error` set, and every query on it yields no
    /// results.
    pub async fn open<S>(store: &S) -> Self
    where
        S: CatalogStore + ?Sized,
    {
        let mut index = Self::new();
        index.load(store).await;
        index
    }

    /// Perform the one catalog read for this index.
    pub async fn load<S>(&mut self, store: &S)
    where
        S: CatalogStore + ?Sized,
    {
        if !self.state.is_loading {
            tracing::debug!("Catalog already loaded, skipping read");
            return;
        }

        let action = match store.list_by_title().await {
            Ok(sheets) => {
                tracing::debug!("Loaded {} music sheets", sheets.len());
                SearchAction::Loaded(sheets)
            }
            Err(e) => {
                tracing::warn!("Error fetching music sheets: {e}");
                SearchAction::LoadFailed(e.to_string())
            }
        };
        self.dispatch(action);
    }

    /// Build an index directly from an already ordered list of sheets.
    pub fn from_sheets(sheets: Vec<SheetRecord>) -> Self {
        let mut index = Self::new();
        index.dispatch(SearchAction::Loaded(sheets));
        index
    }

    pub fn dispatch(&mut self, action: SearchAction) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce_search_state(state, action);
    }

    /// Replace the query text, as on every keystroke.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.dispatch(SearchAction::UpdateQuery(query.into()));
    }

    /// Select `letter`, or clear it if it is already selected.
    pub fn toggle_letter(&mut self, letter: Letter) {
        self.dispatch(SearchAction::ToggleLetter(letter));
    }

    /// Re-run the search with the current inputs.
    pub fn submit(&mut self) {
        self.dispatch(SearchAction::Submit);
    }

    pub fn results(&self) -> &[Arc<SheetRecord>] {
        &self.state.results
    }

    pub fn corpus(&self) -> &[Arc<SheetRecord>] {
        &self.state.corpus
    }

    pub fn query_text(&self) -> &str {
        &self.state.query_text
    }

    pub fn selected_letter(&self) -> Option<Letter> {
        self.state.selected_letter
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    /// User-facing message for a failed catalog read.
    pub fn load_error(&self) -> Option<&str> {
        self.state.load_error.as_deref()
    }

    /// Convert a failed read into an error for callers that cannot render
    /// the error flag themselves.
    pub fn ensure_loaded(&self) -> Result<()> {
        match &self.state.load_error {
            Some(cause) => Err(NyimboError::LoadFailure(cause.clone())),
            None => Ok(()),
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }
}
