mod browse;
mod config;
mod profile;
mod search;
mod sheet;

use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use serde_json::{Value, json};

use crate::config::Config;
use crate::error::Result;
use crate::store::Backends;
use crate::types::Category;

pub use browse::cmd_browse;
pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use profile::cmd_profile;
pub use search::cmd_search;
pub use sheet::{cmd_delete, cmd_edit, cmd_mine, cmd_show, cmd_upload};

/// Configuration and stores shared by every command
pub struct AppContext {
    pub root: PathBuf,
    pub config: Config,
    pub backends: Backends,
}

impl AppContext {
    pub fn load(root: &Path) -> Result<Self> {
        let config = Config::load(root)?;
        let backends = Backends::from_config(&config, root)?;
        Ok(Self {
            root: root.to_path_buf(),
            config,
            backends,
        })
    }

    pub fn user(&self) -> Option<String> {
        self.config.user_id()
    }
}

/// Output of a command in both of its renderings
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn print(self, output_json: bool) -> Result<()> {
        if output_json {
            println!("{}", serde_json::to_string_pretty(&self.json)?);
        } else if let Some(text) = self.text {
            println!("{text}");
        } else {
            println!("{}", serde_json::to_string_pretty(&self.json)?);
        }
        Ok(())
    }
}

/// List the sheet categories
pub fn cmd_categories(output_json: bool) -> Result<()> {
    let json_output = json!({
        "categories": Category::ALL
            .iter()
            .map(|c| json!({ "keyword": c.keyword(), "label": c.label() }))
            .collect::<Vec<_>>(),
    });
    let text = Category::ALL
        .iter()
        .map(|c| format!("{:<24} {}", c.keyword().cyan(), c.label()))
        .collect::<Vec<_>>()
        .join("\n");

    CommandOutput::new(json_output).with_text(text).print(output_json)
}
