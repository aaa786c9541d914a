pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod profile;
pub mod sheet;
pub mod store;
pub mod types;

pub use catalog::{CatalogIndex, Letter, SearchAction, SearchState, filter_sheets};
pub use config::Config;
pub use error::{NyimboError, Result};
pub use store::{CatalogStore, FileStore, HttpStore, MemoryStore, ObjectStore, ProfileStore};
pub use types::{Category, NewSheet, SheetId, SheetPatch, SheetRecord, UserProfile};
