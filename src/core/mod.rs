//! # Core Module
//!
//! The front-end-agnostic picture library engine.
//!
//! ## Modules
//! - `scanner` - Lists capture directories and sequences sibling files
//! - `classifier` - Maps extensions to picture kinds and subfolders
//! - `hasher` - Decodes images and computes perceptual fingerprints
//! - `quality` - Scores focus with a Sobel operator
//! - `hierarchy` - Folder/album records and tree assembly
//! - `comparator` - Groups pictures by fingerprint similarity
//! - `store` - Persists nodes, pictures and settings
//! - `import` - Copies a capture batch into an album
//! - `library` - The operations a front end calls

pub mod classifier;
pub mod comparator;
pub mod hasher;
pub mod hierarchy;
pub mod import;
pub mod library;
pub mod quality;
pub mod scanner;
pub mod store;

// Re-export commonly used types
pub use classifier::PictureKind;
pub use hasher::{Fingerprint, HashAlgorithmKind};
pub use hierarchy::{HierarchyNode, NodeKind, Picture, TreeNode};
pub use import::ImportReport;
pub use library::{CreateNodeRequest, LibraryConfig, LibraryService};
