use owo_colors::OwoColorize;
use serde_json::json;

use super::{AppContext, CommandOutput};
use crate::display::{format_sheet_detail, format_uploaded_at, sheet_to_json};
use crate::error::Result;
use crate::sheet::{
    EditRequest, UploadRequest, delete_sheet, edit_sheet, get_sheet, upload_sheet, user_sheets,
};
use crate::types::SheetId;

/// Display one sheet with all of its fields
pub async fn cmd_show(ctx: &AppContext, id: &str, output_json: bool) -> Result<()> {
    let sheet = get_sheet(ctx.backends.catalog.as_ref(), &SheetId::new(id)).await?;

    CommandOutput::new(sheet_to_json(&sheet))
        .with_text(format_sheet_detail(&sheet))
        .print(output_json)
}

/// Upload a new sheet as the configured user
pub async fn cmd_upload(ctx: &AppContext, request: UploadRequest, output_json: bool) -> Result<()> {
    let user = ctx.user();
    let sheet = upload_sheet(
        ctx.backends.catalog.as_ref(),
        ctx.backends.objects.as_ref(),
        user.as_deref(),
        request,
    )
    .await?;

    let text = format!(
        "Music sheet uploaded successfully! {}",
        sheet.id.as_str().cyan()
    );
    CommandOutput::new(json!({
        "action": "uploaded",
        "sheet": sheet_to_json(&sheet),
    }))
    .with_text(text)
    .print(output_json)
}

/// Edit a sheet owned by the configured user
pub async fn cmd_edit(
    ctx: &AppContext,
    id: &str,
    request: EditRequest,
    output_json: bool,
) -> Result<()> {
    let user = ctx.user();
    let sheet = edit_sheet(
        ctx.backends.catalog.as_ref(),
        ctx.backends.objects.as_ref(),
        user.as_deref(),
        &SheetId::new(id),
        request,
    )
    .await?;

    CommandOutput::new(json!({
        "action": "updated",
        "sheet": sheet_to_json(&sheet),
    }))
    .with_text("Music sheet updated successfully!")
    .print(output_json)
}

/// Delete a sheet owned by the configured user
pub async fn cmd_delete(ctx: &AppContext, id: &str, output_json: bool) -> Result<()> {
    let user = ctx.user();
    delete_sheet(ctx.backends.catalog.as_ref(), user.as_deref(), &SheetId::new(id)).await?;

    CommandOutput::new(json!({
        "action": "deleted",
        "id": id,
    }))
    .with_text("Music sheet deleted successfully!")
    .print(output_json)
}

/// List the configured user's own uploads, newest first
pub async fn cmd_mine(ctx: &AppContext, output_json: bool) -> Result<()> {
    let user = ctx.user();
    let sheets = user_sheets(ctx.backends.catalog.as_ref(), user.as_deref()).await?;

    let json_output = json!({
        "user": user,
        "sheets": sheets.iter().map(sheet_to_json).collect::<Vec<_>>(),
    });

    let text = if sheets.is_empty() {
        "You haven't uploaded any music sheets yet.".to_string()
    } else {
        let mut lines = vec![format!(
            "{} ({} uploads)",
            "My Music Sheets".bold(),
            sheets.len()
        )];
        for sheet in &sheets {
            lines.push(format!(
                "{:<24} {}  {}",
                sheet.id.as_str().cyan(),
                sheet.title.as_deref().unwrap_or("(untitled)"),
                format!("Uploaded on: {}", format_uploaded_at(sheet.uploaded_at)).dimmed()
            ));
        }
        lines.join("\n")
    };

    CommandOutput::new(json_output).with_text(text).print(output_json)
}
