//! Term and letter filtering over the loaded catalog
//!
//! A sheet matches when the query text appears, case-insensitively, in its
//! title or its composer, and when its title starts with the selected
//! letter. Missing fields are treated as empty strings, so a malformed
//! document can fail to match but never aborts the pass.

use std::sync::Arc;

use crate::catalog::letter::Letter;
use crate::types::SheetRecord;

/// Query text lowered once so every record comparison reuses it.
#[derive(Debug, Clone)]
struct Needle(String);

impl Needle {
    fn new(query: &str) -> Self {
        Needle(query.to_lowercase())
    }

    fn found_in(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.0)
    }
}

/// True if `query` is empty or appears in the sheet's title or composer.
pub fn matches_search(sheet: &SheetRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = Needle::new(query);
    matches_needle(sheet, &needle)
}

fn matches_needle(sheet: &SheetRecord, needle: &Needle) -> bool {
    needle.0.is_empty()
        || needle.found_in(sheet.title_str())
        || needle.found_in(sheet.composer_str())
}

/// True if no letter is selected or the sheet's title starts with it.
pub fn matches_letter(sheet: &SheetRecord, letter: Option<Letter>) -> bool {
    match letter {
        None => true,
        Some(letter) => letter.starts(sheet.title_str()),
    }
}

/// Filter the corpus by query text and letter facet.
///
/// The result keeps corpus order. Records are shared with the corpus, not
/// copied.
pub fn filter_sheets(
    corpus: &[Arc<SheetRecord>],
    query: &str,
    letter: Option<Letter>,
) -> Vec<Arc<SheetRecord>> {
    if query.is_empty() && letter.is_none() {
        return corpus.to_vec();
    }

    let needle = Needle::new(query);
    corpus
        .iter()
        .filter(|sheet| matches_needle(sheet, &needle) && matches_letter(sheet, letter))
        .cloned()
        .collect()
}
