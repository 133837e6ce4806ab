//! # Error Module
//!
//! Error types for the picture library.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, names, ids, what went wrong
//! - **Per-file problems are warnings** - only batch-halting failures are errors

use std::path::PathBuf;
use thiserror::Error;

/// Top-level library error
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Hierarchy error: {0}")]
    Hierarchy(#[from] HierarchyError),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors that occur while listing a source directory
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while decoding, hashing or scoring an image
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("Failed to decode image {path}: {reason}")]
    DecodeError { path: PathBuf, reason: String },

    #[error("Image is empty or corrupted: {path}")]
    EmptyImage { path: PathBuf },

    #[error("Resize failed: {0}")]
    ResizeFailed(String),

    #[error("Hash computation failed: {0}")]
    ComputationFailed(String),

    #[error("Failed to open image file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the hierarchy and picture stores
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to open library database at {path}: {reason}")]
    OpenFailed { path: PathBuf, reason: String },

    #[error("Database query failed: {0}")]
    QueryFailed(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Library database lock poisoned at {path}. Restart and try again.")]
    Poisoned { path: PathBuf },

    #[error("Invalid stored value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::QueryFailed(e.to_string())
    }
}

/// Errors rejected by node creation before any side effect
#[derive(Error, Debug)]
pub enum HierarchyError {
    #[error("Invalid hierarchy type: {value} (expected folder or album)")]
    InvalidType { value: String },

    #[error("A folder named {name} already exists here")]
    DuplicateName { name: String, parent_id: Option<i64> },

    #[error("Failed to create album directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that halt an import batch
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Failed to list source directory: {0}")]
    Listing(#[from] ScanError),

    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to store picture {file}: {source}")]
    Persist {
        file: PathBuf,
        #[source]
        source: StoreError,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, LibraryError>;
