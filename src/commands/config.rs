//! Configuration commands for managing nyimbo settings.
//!
//! - `config set`: Set a configuration value
//! - `config get`: Print one configuration value
//! - `config show`: Display current configuration

use std::path::Path;

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::config::Config;
use crate::error::{NyimboError, Result};

/// Show current configuration
pub fn cmd_config_show(root: &Path, output_json: bool) -> Result<()> {
    let config = Config::load(root)?;
    let user = config.user_id();
    let store_url = config.store_url();

    let json_output = json!({
        "store": config.store.to_string(),
        "data_dir": config.data_dir(root).to_string_lossy(),
        "http": {
            "base_url": store_url,
            "timeout": config.http.timeout,
        },
        "user": user,
        "config_file": Config::config_path(root).to_string_lossy(),
    });

    let not_configured = || "not configured".dimmed().to_string();
    let mut text = format!("{}\n\n", "Configuration:".cyan().bold());
    text.push_str(&format!("{}: {}\n", "store".cyan(), config.store));
    text.push_str(&format!(
        "{}: {}\n",
        "data_dir".cyan(),
        config.data_dir(root).display()
    ));
    text.push_str(&format!("{}:\n", "http".cyan()));
    text.push_str(&format!(
        "  base_url: {}\n",
        store_url.unwrap_or_else(not_configured)
    ));
    text.push_str(&format!("  timeout: {}s\n", config.http.timeout));
    text.push_str(&format!(
        "{}: {}\n\n",
        "user".cyan(),
        user.unwrap_or_else(not_configured)
    ));
    text.push_str(&format!(
        "{}",
        format!("Config file: {}", Config::config_path(root).display()).dimmed()
    ));

    CommandOutput::new(json_output).with_text(text).print(output_json)
}

/// Set a configuration value
pub fn cmd_config_set(root: &Path, key: &str, value: &str, output_json: bool) -> Result<()> {
    let mut config = Config::load(root)?;
    config.set(key, value)?;
    config.save(root)?;

    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": value,
        "success": true,
    }))
    .with_text(format!("Set {} to {}", key.cyan(), value))
    .print(output_json)
}

/// Get a configuration value
pub fn cmd_config_get(root: &Path, key: &str, output_json: bool) -> Result<()> {
    let config = Config::load(root)?;
    let value = config
        .get(key)?
        .ok_or_else(|| NyimboError::Config(format!("{key} not set")))?;

    CommandOutput::new(json!({
        "key": key,
        "value": value,
    }))
    .with_text(value.clone())
    .print(output_json)
}
