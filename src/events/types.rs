//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the library
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Hierarchy changes
    Library(LibraryEvent),
    /// Import phase events
    Import(ImportEvent),
}

/// Events emitted when nodes are created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LibraryEvent {
    /// A folder node was stored
    FolderCreated { id: i64, name: String },
    /// An album node was stored, directories included
    AlbumCreated {
        id: i64,
        name: String,
        uuid: String,
    },
}

/// Events during an album import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ImportEvent {
    /// Import has started
    Started { source: PathBuf, album_id: i64 },
    /// Source directory was listed and grouped into captures
    GroupsFound { groups: usize, files: usize },
    /// Progress update after each file
    Progress(ImportProgress),
    /// A picture was copied and stored
    PictureImported {
        sequence: String,
        destination: PathBuf,
    },
    /// A file had no destination subfolder and was left alone
    FileSkipped { path: PathBuf },
    /// Hashing or scoring failed; the picture was stored without them
    Warning { path: PathBuf, message: String },
    /// Import stopped early on request
    Cancelled { imported: usize },
    /// Import completed
    Completed(ImportSummary),
}

/// Progress information during an import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportProgress {
    /// Files handled so far (imported or skipped)
    pub completed: usize,
    /// Total files in the source directory
    pub total: usize,
    /// File being handled
    pub current_path: PathBuf,
}

/// Summary of a finished import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Pictures stored
    pub imported: usize,
    /// Files skipped for lack of a destination
    pub skipped: usize,
    /// Per-file processing warnings
    pub warnings: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}
