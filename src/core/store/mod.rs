//! # Store Module
//!
//! Persists the library: hierarchy nodes, subfolders, pictures and settings.
//!
//! ## Backends
//! - `InMemoryStore` - For tests and throwaway sessions
//! - `SqliteStore` - Persistent, one database file per library
//!
//! All backends hand out fully materialized records. Callers never
//! hold references into the store.

mod memory;
mod sqlite;
mod traits;

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{HierarchyStore, LibraryStore, PictureStore, SettingsStore};

use serde::{Deserialize, Serialize};

/// Name of the database file created inside a library root
pub const DATABASE_FILE: &str = "picturebot.db";

/// Application settings, stored as a single record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub theme_mode: String,
    pub library_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme_mode: "system".to_string(),
            library_path: String::new(),
        }
    }
}
