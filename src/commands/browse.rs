//! Line-driven catalog browser
//!
//! Each input line is one event against a single loaded index:
//! - any text replaces the search box contents (an empty line clears it)
//! - `@X` toggles the letter facet `X`
//! - `!` re-runs the search, like pressing the Search button
//! - `:q` quits

use owo_colors::OwoColorize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use super::AppContext;
use crate::catalog::{CatalogIndex, Letter};
use crate::display::{NO_RESULTS, format_letter_bar};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseInput {
    Query(String),
    ToggleLetter(Letter),
    Submit,
    Quit,
}

pub fn parse_browse_input(line: &str) -> Result<BrowseInput> {
    let trimmed = line.trim_end_matches(['\r', '\n']);
    match trimmed {
        ":q" | ":quit" => Ok(BrowseInput::Quit),
        "!" => Ok(BrowseInput::Submit),
        _ => match trimmed.strip_prefix('@') {
            Some(letter) => Ok(BrowseInput::ToggleLetter(letter.parse()?)),
            None => Ok(BrowseInput::Query(trimmed.to_string())),
        },
    }
}

fn render(index: &CatalogIndex) -> String {
    let mut out = format_letter_bar(index.selected_letter());
    out.push('\n');

    let results = index.results();
    if results.is_empty() {
        out.push_str(NO_RESULTS);
        out.push('\n');
        return out;
    }
    for sheet in results {
        out.push_str(&format!(
            "  {}  {}\n",
            sheet.title.as_deref().unwrap_or("(untitled)"),
            sheet.composer_str().dimmed()
        ));
    }
    out.push_str(&format!(
        "{}\n",
        format!("{} of {} sheets", results.len(), index.corpus().len()).dimmed()
    ));
    out
}

/// Browse the catalog interactively from stdin
pub async fn cmd_browse(ctx: &AppContext) -> Result<()> {
    let mut index = CatalogIndex::open(ctx.backends.catalog.as_ref()).await;
    index.ensure_loaded()?;

    let mut stdout = tokio::io::stdout();
    stdout.write_all(render(&index).as_bytes()).await?;
    stdout.flush().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_browse_input(&line) {
            Ok(BrowseInput::Quit) => break,
            Ok(BrowseInput::Query(query)) => index.set_query(query),
            Ok(BrowseInput::ToggleLetter(letter)) => index.toggle_letter(letter),
            Ok(BrowseInput::Submit) => index.submit(),
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        }
        stdout.write_all(render(&index).as_bytes()).await?;
        stdout.flush().await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NyimboError;
    use crate::types::{SheetId, SheetRecord};

    #[test]
    fn test_parse_inputs() {
        assert_eq!(parse_browse_input(":q").unwrap(), BrowseInput::Quit);
        assert_eq!(parse_browse_input("!").unwrap(), BrowseInput::Submit);
        assert_eq!(
            parse_browse_input("@a").unwrap(),
            BrowseInput::ToggleLetter(Letter::new('A').unwrap())
        );
        assert_eq!(
            parse_browse_input("ngai\r\n").unwrap(),
            BrowseInput::Query("ngai".to_string())
        );
        assert_eq!(
            parse_browse_input("").unwrap(),
            BrowseInput::Query(String::new())
        );
    }

    #[test]
    fn test_parse_bad_letter() {
        assert!(matches!(
            parse_browse_input("@ab"),
            Err(NyimboError::InvalidLetter(_))
        ));
    }

    #[test]
    fn test_render_empty_and_populated() {
        let mut index = CatalogIndex::from_sheets(vec![SheetRecord {
            id: SheetId::new("1"),
            title: Some("Amen".to_string()),
            composer: Some("X".to_string()),
            ..Default::default()
        }]);
        assert!(render(&index).contains("Amen"));

        index.set_query("zzz");
        assert!(render(&index).contains(NO_RESULTS));
    }
}
