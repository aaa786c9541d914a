use thiserror::Error;

#[derive(Error, Debug)]
pub enum NyimboError {
    #[error("Music sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Failed to load music sheets: {0}")]
    LoadFailure(String),

    #[error("invalid letter '{0}', expected a single letter A-Z")]
    InvalidLetter(String),

    #[error("unknown category '{0}' (run `nyimbo categories` for the list)")]
    InvalidCategory(String),

    #[error("{0}")]
    Validation(String),

    #[error("You must be logged in to {0}.")]
    NotLoggedIn(&'static str),

    #[error("You do not have permission to {0} this sheet.")]
    PermissionDenied(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, NyimboError>;
