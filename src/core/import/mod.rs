//! # Import Module
//!
//! Copies one capture batch into an album and stores a picture per file.
//!
//! ## Steps
//! 1. List the source directory and group sibling files into captures
//! 2. Number captures in capture order (`000001`, `000002`, ...)
//! 3. Copy each file into the album subfolder for its kind
//! 4. Fingerprint and score display images
//! 5. Store each picture as soon as it is copied
//!
//! Per-file processing failures become warnings. Copy and store
//! failures halt the batch; everything done before them stays.

mod cancel;
mod executor;
mod types;

pub use cancel::CancellationToken;
pub use executor::{ImportOrchestrator, ImportOrchestratorBuilder};
pub use types::{ImportReport, ImportWarning};
