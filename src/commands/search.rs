use owo_colors::OwoColorize;
use serde_json::json;

use super::{AppContext, CommandOutput};
use crate::catalog::{CatalogIndex, Letter};
use crate::display::{NO_RESULTS, format_letter_bar, format_sheet_line, sheet_to_json};
use crate::error::Result;

/// Search the catalog by title/composer text and an optional first letter
pub async fn cmd_search(
    ctx: &AppContext,
    query: Option<&str>,
    letter: Option<Letter>,
    output_json: bool,
) -> Result<()> {
    let mut index = CatalogIndex::open(ctx.backends.catalog.as_ref()).await;
    index.ensure_loaded()?;

    if let Some(query) = query {
        index.set_query(query);
    }
    if let Some(letter) = letter {
        index.toggle_letter(letter);
    }
    index.submit();

    let results = index.results();
    let json_output = json!({
        "query": index.query_text(),
        "letter": index.selected_letter().map(|l| l.to_string()),
        "total": index.corpus().len(),
        "results": results.iter().map(|s| sheet_to_json(s)).collect::<Vec<_>>(),
    });

    let mut text = format!(
        "{}\n{}\n",
        "Music Sheets".bold(),
        format_letter_bar(index.selected_letter())
    );
    if results.is_empty() {
        text.push('\n');
        text.push_str(NO_RESULTS);
    } else {
        for sheet in results {
            text.push('\n');
            text.push_str(&format_sheet_line(sheet));
            text.push('\n');
        }
        text.push_str(&format!(
            "\n{}",
            format!("{} of {} sheets", results.len(), index.corpus().len()).dimmed()
        ));
    }

    CommandOutput::new(json_output).with_text(text).print(output_json)
}
