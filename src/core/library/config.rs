//! Library configuration.

use crate::core::comparator::DEFAULT_THRESHOLD;
use crate::core::hasher::HashAlgorithmKind;
use crate::core::quality::DEFAULT_MAX_WIDTH;
use crate::core::store::DATABASE_FILE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for a library rooted at one directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Albums are created as `<library_root>/<uuid>/`
    pub library_root: PathBuf,
    /// Default threshold for similarity grouping (lower = stricter)
    pub similarity_threshold: u32,
    /// Fingerprint algorithm used at import time
    pub hash_algorithm: HashAlgorithmKind,
    /// Images wider than this are shrunk before sharpness scoring
    pub sharpness_max_width: u32,
}

impl LibraryConfig {
    /// Configuration with defaults for the given root
    pub fn new(library_root: impl Into<PathBuf>) -> Self {
        Self {
            library_root: library_root.into(),
            similarity_threshold: DEFAULT_THRESHOLD,
            hash_algorithm: HashAlgorithmKind::default(),
            sharpness_max_width: DEFAULT_MAX_WIDTH,
        }
    }

    pub fn similarity_threshold(mut self, threshold: u32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn hash_algorithm(mut self, algorithm: HashAlgorithmKind) -> Self {
        self.hash_algorithm = algorithm;
        self
    }

    pub fn sharpness_max_width(mut self, width: u32) -> Self {
        self.sharpness_max_width = width;
        self
    }

    /// Directory for an album with the given UUID
    pub fn album_dir(&self, uuid: &str) -> PathBuf {
        self.library_root.join(uuid)
    }

    /// Default database location inside the library root
    pub fn default_database_path(&self) -> PathBuf {
        default_database_path(&self.library_root)
    }
}

/// `<root>/picturebot.db`
pub fn default_database_path(root: &Path) -> PathBuf {
    root.join(DATABASE_FILE)
}
