//! # Classifier Module
//!
//! Maps a file extension to a picture kind and the album subfolder the
//! file is copied into.
//!
//! | Extension | Kind | Destination |
//! |-----------|------|-------------|
//! | .jpg, .jpeg | Display | `JPGs` |
//! | .arw, .cr2, .nef | Raw | `RAWs` |
//! | anything else | Unknown | none |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Subfolder receiving RAW captures
pub const RAW_FOLDER: &str = "RAWs";
/// Subfolder receiving display (JPEG) captures
pub const DISPLAY_FOLDER: &str = "JPGs";
/// Subfolders every imported album gets, in creation order
pub const STANDARD_SUBFOLDERS: [&str; 2] = [RAW_FOLDER, DISPLAY_FOLDER];

/// What a picture file is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PictureKind {
    /// Decodable image, hashed and scored on import
    Display,
    /// Camera RAW, stored as-is
    Raw,
    #[default]
    Unknown,
}

impl PictureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Display => "display",
            Self::Raw => "raw",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PictureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PictureKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "display" => Ok(Self::Display),
            "raw" => Ok(Self::Raw),
            "unknown" => Ok(Self::Unknown),
            other => Err(format!("unknown picture kind: {}", other)),
        }
    }
}

/// Result of classifying an extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: PictureKind,
    /// Subfolder name, `None` when the file is not imported
    pub destination: Option<&'static str>,
}

/// Classify a file extension, with or without its leading dot.
///
/// Matching is case-insensitive: `.JPG`, `.jpg` and `jpg` are equivalent.
pub fn classify(extension: &str) -> Classification {
    let ext = extension.trim_start_matches('.').to_ascii_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => Classification {
            kind: PictureKind::Display,
            destination: Some(DISPLAY_FOLDER),
        },
        "arw" | "cr2" | "nef" => Classification {
            kind: PictureKind::Raw,
            destination: Some(RAW_FOLDER),
        },
        _ => Classification {
            kind: PictureKind::Unknown,
            destination: None,
        },
    }
}
