//! Filesystem directory listing using walkdir.

use super::{DirectoryLister, SourceFile};
use crate::error::ScanError;
use std::path::Path;
use std::time::SystemTime;
use tracing::debug;
use walkdir::WalkDir;

/// Configuration for the directory lister
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files (names starting with `.`)
    pub include_hidden: bool,
}

/// Lists the top level of a directory on the local filesystem
pub struct FsLister {
    config: ScanConfig,
}

impl FsLister {
    /// Create a new lister with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    fn is_hidden(path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with('.'))
            .unwrap_or(false)
    }
}

impl Default for FsLister {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

impl DirectoryLister for FsLister {
    fn list(&self, dir: &Path) -> Result<Vec<SourceFile>, ScanError> {
        if !dir.is_dir() {
            return Err(ScanError::DirectoryNotFound {
                path: dir.to_path_buf(),
            });
        }

        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.config.follow_symlinks);

        let mut files = Vec::new();

        for entry_result in walker {
            let entry = entry_result.map_err(|e| {
                let path = e.path().map(|p| p.to_path_buf()).unwrap_or_else(|| dir.to_path_buf());
                if e.io_error().map(|io| io.kind()) == Some(std::io::ErrorKind::PermissionDenied) {
                    ScanError::PermissionDenied { path }
                } else {
                    ScanError::ReadDirectory {
                        path,
                        source: std::io::Error::other(e.to_string()),
                    }
                }
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if !self.config.include_hidden && Self::is_hidden(path) {
                debug!(path = %path.display(), "skipping hidden file");
                continue;
            }

            let metadata = entry.metadata().map_err(|e| ScanError::ReadDirectory {
                path: path.to_path_buf(),
                source: std::io::Error::other(e.to_string()),
            })?;
            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

            if let Some(file) = SourceFile::new(path, modified) {
                files.push(file);
            }
        }

        Ok(files)
    }
}
