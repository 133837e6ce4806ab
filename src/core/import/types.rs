//! Import results.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A per-file problem that did not stop the import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportWarning {
    /// Copied file the warning is about
    pub file: PathBuf,
    pub message: String,
}

/// Outcome of importing one source directory into one album
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportReport {
    /// Pictures copied and stored
    pub imported: usize,
    /// Files left alone because their kind has no destination
    pub skipped: usize,
    /// Hashing or scoring failures; those pictures were stored with zeros
    pub warnings: Vec<ImportWarning>,
    /// Stopped early on request
    pub cancelled: bool,
    /// The source directory did not exist; nothing was done
    pub source_missing: bool,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl ImportReport {
    pub(crate) fn source_missing() -> Self {
        Self {
            source_missing: true,
            ..Self::default()
        }
    }
}
