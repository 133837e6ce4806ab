//! # Scanner Module
//!
//! Lists the files of a capture directory and groups them into captures.
//!
//! A camera writing RAW+JPEG produces sibling files that share a base
//! name (`DSC0042.ARW`, `DSC0042.JPG`). Those siblings form one capture
//! group and receive one shared sequence number.
//!
//! ## Example
//! ```rust,ignore
//! use picturebot::core::scanner::{DirectoryLister, FsLister, ScanConfig, group_captures};
//!
//! let lister = FsLister::new(ScanConfig::default());
//! let groups = group_captures(lister.list(Path::new("/Volumes/SD/DCIM/100MSDCF"))?);
//! assert_eq!(groups[0].sequence, "000001");
//! ```

mod lister;
mod sequencer;

pub use lister::{FsLister, ScanConfig};
pub use sequencer::{format_sequence, group_captures, CaptureGroup};

use crate::error::ScanError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A regular file found directly inside a source directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File name including extension
    pub file_name: String,
    /// File name without its extension; siblings share it
    pub base_name: String,
    /// Extension with its leading dot, original case (empty when absent)
    pub extension: String,
    /// Last modified time
    pub modified: SystemTime,
}

impl SourceFile {
    /// Describe a file by path and modification time.
    ///
    /// Returns `None` for paths without a file name (e.g. `/` or `..`).
    pub fn new(path: &Path, modified: SystemTime) -> Option<Self> {
        let file_name = path.file_name()?.to_string_lossy().into_owned();
        let base_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.clone());
        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        Some(Self {
            path: path.to_path_buf(),
            file_name,
            base_name,
            extension,
            modified,
        })
    }
}

/// Directory-listing capability used by the importer.
///
/// Implement this trait to feed the importer from somewhere other than
/// the local filesystem (e.g., in tests).
pub trait DirectoryLister: Send + Sync {
    /// List regular files directly inside `dir` (non-recursive)
    fn list(&self, dir: &Path) -> Result<Vec<SourceFile>, ScanError>;
}
