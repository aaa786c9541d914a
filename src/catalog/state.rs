//! Search state and its reducer
//!
//! Every user input and the load completion is an action fed through
//! `reduce_search_state`, which always finishes by recomputing `results`
//! from the three inputs. Typing and an explicit submit therefore converge
//! on the same results.

use std::sync::Arc;

use crate::catalog::filter::filter_sheets;
use crate::catalog::letter::Letter;
use crate::types::SheetRecord;

/// State of one catalog search session.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    /// Catalog snapshot, ordered by title. Set once by `Loaded`.
    pub corpus: Vec<Arc<SheetRecord>>,
    /// Current free-text query
    pub query_text: String,
    /// Active letter facet, if any
    pub selected_letter: Option<Letter>,
    /// Derived from the three fields above; never edited directly
    pub results: Vec<Arc<SheetRecord>>,
    /// Whether the catalog read is still outstanding
    pub is_loading: bool,
    /// Cause of a failed catalog read
    pub load_error: Option<String>,
}

impl SearchState {
    /// State at mount time: nothing loaded yet, load pending.
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Default::default()
        }
    }

    fn recompute(&mut self) {
        self.results = filter_sheets(&self.corpus, &self.query_text, self.selected_letter);
    }
}

/// Events that change search state
#[derive(Debug, Clone, PartialEq)]
pub enum SearchAction {
    /// The catalog read completed
    Loaded(Vec<SheetRecord>),
    /// The catalog read failed
    LoadFailed(String),
    /// Query text changed (one keystroke)
    UpdateQuery(String),
    /// Letter button pressed
    ToggleLetter(Letter),
    /// Search button or Enter
    Submit,
}

pub fn reduce_search_state(mut state: SearchState, action: SearchAction) -> SearchState {
    match action {
        SearchAction::Loaded(sheets) => {
            if state.is_loading {
                state.corpus = sheets.into_iter().map(Arc::new).collect();
            } else {
                tracing::debug!("Ignoring catalog load after the snapshot was already set");
            }
            state.is_loading = false;
        }
        SearchAction::LoadFailed(cause) => {
            if state.is_loading {
                state.load_error = Some(cause);
            }
            state.is_loading = false;
        }
        SearchAction::UpdateQuery(query) => {
            state.query_text = query;
        }
        SearchAction::ToggleLetter(letter) => {
            state.selected_letter = if state.selected_letter == Some(letter) {
                None
            } else {
                Some(letter)
            };
        }
        SearchAction::Submit => {}
    }

    state.recompute();
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SheetId;

    fn make_sheet(id: &str, title: &str, composer: &str) -> SheetRecord {
        SheetRecord {
            id: SheetId::new(id),
            title: Some(title.to_string()),
            composer: Some(composer.to_string()),
            ..Default::default()
        }
    }

    fn loaded_state() -> SearchState {
        reduce_search_state(
            SearchState::loading(),
            SearchAction::Loaded(vec![
                make_sheet("1", "Amen", "X"),
                make_sheet("2", "Banana", "Y"),
                make_sheet("3", "Apple", "Z"),
            ]),
        )
    }

    fn ids(state: &SearchState) -> Vec<&str> {
        state.results.iter().map(|s| s.id.as_str()).collect()
    }

    fn letter(c: char) -> Letter {
        Letter::new(c).unwrap()
    }

    #[test]
    fn test_load_sets_results_to_corpus() {
        let state = loaded_state();
        assert!(!state.is_loading);
        assert_eq!(state.corpus.len(), 3);
        assert_eq!(ids(&state), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_load_failure_leaves_corpus_empty() {
        let state = reduce_search_state(
            SearchState::loading(),
            SearchAction::LoadFailed("backend unavailable".to_string()),
        );
        assert!(!state.is_loading);
        assert_eq!(state.load_error.as_deref(), Some("backend unavailable"));
        assert!(state.corpus.is_empty());

        let state = reduce_search_state(state, SearchAction::UpdateQuery("a".to_string()));
        assert!(state.results.is_empty());
        let state = reduce_search_state(state, SearchAction::ToggleLetter(letter('A')));
        assert!(state.results.is_empty());
    }

    #[test]
    fn test_second_load_does_not_replace_snapshot() {
        let state = loaded_state();
        let state = reduce_search_state(
            state,
            SearchAction::Loaded(vec![make_sheet("9", "Other", "Q")]),
        );
        assert_eq!(ids(&state), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_toggle_same_letter_twice_restores_results() {
        let state = reduce_search_state(loaded_state(), SearchAction::UpdateQuery("a".into()));
        let before = ids(&state).join(",");

        let state = reduce_search_state(state, SearchAction::ToggleLetter(letter('A')));
        assert_eq!(state.selected_letter, Some(letter('A')));
        assert_eq!(ids(&state), vec!["1", "3"]);

        let state = reduce_search_state(state, SearchAction::ToggleLetter(letter('A')));
        assert_eq!(state.selected_letter, None);
        assert_eq!(ids(&state).join(","), before);
    }

    #[test]
    fn test_toggle_other_letter_replaces_selection() {
        let state = reduce_search_state(loaded_state(), SearchAction::ToggleLetter(letter('A')));
        let state = reduce_search_state(state, SearchAction::ToggleLetter(letter('B')));
        assert_eq!(state.selected_letter, Some(letter('B')));
        assert_eq!(ids(&state), vec!["2"]);
    }

    #[test]
    fn test_submit_is_idempotent() {
        let state = reduce_search_state(loaded_state(), SearchAction::UpdateQuery("an".into()));
        let typed = ids(&state).join(",");

        let state = reduce_search_state(state, SearchAction::Submit);
        let once = ids(&state).join(",");
        let state = reduce_search_state(state, SearchAction::Submit);
        let twice = ids(&state).join(",");

        assert_eq!(typed, "2");
        assert_eq!(typed, once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_keystrokes_narrow_then_widen() {
        let mut state = loaded_state();
        let mut counts = Vec::new();
        for query in ["a", "ap", "app", "ap", "a", ""] {
            state = reduce_search_state(state, SearchAction::UpdateQuery(query.to_string()));
            counts.push(state.results.len());
        }
        assert_eq!(counts, vec![3, 1, 1, 1, 3, 3]);
    }
}
