use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::catalog::Letter;
use crate::types::Category;

#[derive(Parser)]
#[command(name = "nyimbo")]
#[command(about = "Shared catalog of Kikuyu Catholic music sheets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search the catalog by title or composer
    #[command(visible_alias = "s")]
    Search {
        /// Text to find in titles and composers (case-insensitive)
        query: Option<String>,

        /// Only sheets whose title starts with this letter
        #[arg(short, long, value_parser = parse_letter)]
        letter: Option<Letter>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Browse the catalog interactively, one input line per event
    Browse,

    /// Display a music sheet
    Show {
        /// Sheet ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Upload a PDF music sheet
    Upload {
        /// Path to the PDF file
        file: PathBuf,

        /// Title of the music sheet
        #[arg(short, long)]
        title: String,

        /// Composer's name
        #[arg(short, long)]
        composer: String,

        /// Category (see `nyimbo categories`)
        #[arg(short = 'k', long, value_parser = parse_category)]
        category: Category,

        /// Lyrics or notes
        #[arg(short, long, default_value = "")]
        description: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit one of your music sheets
    Edit {
        /// Sheet ID
        id: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New composer
        #[arg(short, long)]
        composer: Option<String>,

        /// New lyrics or notes
        #[arg(short, long)]
        description: Option<String>,

        /// New category
        #[arg(short = 'k', long, value_parser = parse_category)]
        category: Option<Category>,

        /// Replacement PDF file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete one of your music sheets
    Delete {
        /// Sheet ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List your own uploads, newest first
    Mine {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show your profile, or set your profile picture
    Profile {
        /// Image file to use as your profile picture
        #[arg(short, long)]
        picture: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the sheet categories
    Categories {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set a configuration value
    Set {
        /// Key: store, data_dir, http.base_url, http.timeout, user
        key: String,

        /// Value
        value: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Get a configuration value
    Get {
        /// Key: store, data_dir, http.base_url, http.timeout, user
        key: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_letter(s: &str) -> Result<Letter, String> {
    s.parse().map_err(|e: crate::error::NyimboError| e.to_string())
}

fn parse_category(s: &str) -> Result<Category, String> {
    s.parse().map_err(|e: crate::error::NyimboError| e.to_string())
}
