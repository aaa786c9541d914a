use std::path::Path;

use owo_colors::OwoColorize;
use serde_json::json;

use super::{AppContext, CommandOutput};
use crate::display::{format_uploaded_at, sheet_to_json};
use crate::error::Result;
use crate::profile::{update_profile_picture, view_profile};

/// Show the configured user's profile, optionally replacing the picture first
pub async fn cmd_profile(ctx: &AppContext, picture: Option<&Path>, output_json: bool) -> Result<()> {
    let user = ctx.user();

    if let Some(picture) = picture {
        update_profile_picture(
            ctx.backends.profiles.as_ref(),
            ctx.backends.objects.as_ref(),
            user.as_deref(),
            picture,
        )
        .await?;
        if !output_json {
            println!("Profile picture updated successfully!");
        }
    }

    let view = view_profile(
        ctx.backends.catalog.as_ref(),
        ctx.backends.profiles.as_ref(),
        user.as_deref(),
    )
    .await?;

    let json_output = json!({
        "user": view.user,
        "profilePicUrl": view.profile.profile_pic_url,
        "sheets": view.sheets.iter().map(sheet_to_json).collect::<Vec<_>>(),
    });

    let mut lines = vec![
        format!("{}", "User Profile".bold()),
        format!("{}: {}", "user".cyan(), view.user),
        format!(
            "{}: {}",
            "picture".cyan(),
            view.profile
                .profile_pic_url
                .as_deref()
                .unwrap_or("none")
        ),
        String::new(),
    ];
    if view.sheets.is_empty() {
        lines.push("You haven't uploaded any music sheets yet.".to_string());
    } else {
        lines.push(format!("My Music Sheets ({})", view.sheets.len()));
        for sheet in &view.sheets {
            lines.push(format!(
                "  {}  {}",
                sheet.title.as_deref().unwrap_or("(untitled)"),
                format!("Uploaded on: {}", format_uploaded_at(sheet.uploaded_at)).dimmed()
            ));
        }
    }

    CommandOutput::new(json_output)
        .with_text(lines.join("\n"))
        .print(output_json)
}
