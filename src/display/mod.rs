use jiff::Timestamp;
use jiff::tz::TimeZone;
use owo_colors::OwoColorize;
use serde_json::{Value, json};

use crate::catalog::Letter;
use crate::types::SheetRecord;

pub const NO_RESULTS: &str = "No music sheets found matching your search.";
pub const DATE_NOT_AVAILABLE: &str = "Date not available";

/// Render an upload date in the local time zone, or the placeholder.
pub fn format_uploaded_at(uploaded_at: Option<Timestamp>) -> String {
    format_date_in(uploaded_at, &TimeZone::system())
}

fn format_date_in(timestamp: Option<Timestamp>, tz: &TimeZone) -> String {
    match timestamp {
        Some(ts) => ts.to_zoned(tz.clone()).date().to_string(),
        None => DATE_NOT_AVAILABLE.to_string(),
    }
}

/// Format a sheet as a search result block
pub fn format_sheet_line(sheet: &SheetRecord) -> String {
    let title = sheet.title.as_deref().unwrap_or("(untitled)");
    format!(
        "{}  {}\n  Composer: {}\n  {}",
        title.blue().bold(),
        sheet.detail_path().dimmed(),
        sheet.composer_str(),
        format!("Uploaded on: {}", format_uploaded_at(sheet.uploaded_at)).dimmed()
    )
}

/// Format every stored field of a sheet
pub fn format_sheet_detail(sheet: &SheetRecord) -> String {
    let field = |value: Option<&str>| value.unwrap_or("-").to_string();
    let mut lines = vec![
        format!("{}", sheet.title.as_deref().unwrap_or("(untitled)").bold()),
        format!("{}: {}", "id".cyan(), sheet.id),
        format!("{}: {}", "composer".cyan(), field(sheet.composer.as_deref())),
        format!(
            "{}: {}",
            "category".cyan(),
            sheet
                .category
                .map(|c| c.label().to_string())
                .unwrap_or_else(|| "-".to_string())
        ),
        format!("{}: {}", "uploaded by".cyan(), field(sheet.uploaded_by.as_deref())),
        format!(
            "{}: {}",
            "uploaded on".cyan(),
            format_uploaded_at(sheet.uploaded_at)
        ),
        format!("{}: {}", "file".cyan(), field(sheet.file_url.as_deref())),
    ];
    if let Some(description) = sheet.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(String::new());
        lines.push(description.to_string());
    }
    lines.join("\n")
}

/// Render the A-Z facet bar with the active letter highlighted
pub fn format_letter_bar(selected: Option<Letter>) -> String {
    Letter::alphabet()
        .map(|letter| {
            if Some(letter) == selected {
                format!("[{letter}]").blue().bold().to_string()
            } else {
                format!(" {letter} ").dimmed().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("")
}

/// JSON view of a sheet, including its detail route
pub fn sheet_to_json(sheet: &SheetRecord) -> Value {
    json!({
        "id": sheet.id.as_str(),
        "title": sheet.title,
        "composer": sheet.composer,
        "description": sheet.description,
        "category": sheet.category.map(|c| c.label()),
        "fileUrl": sheet.file_url,
        "uploadedBy": sheet.uploaded_by,
        "uploadedAt": sheet.uploaded_at.map(|t| t.to_string()),
        "detailPath": sheet.detail_path(),
    })
}
