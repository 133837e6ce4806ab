//! # Picturebot
//!
//! A photo library that imports capture batches into albums, fingerprints
//! and focus-scores the display images, and groups near-identical shots.
//!
//! ## Core Philosophy
//! - **Never touch the source** - Imports copy; the memory card is left as is
//! - **Keep siblings together** - RAW and JPEG of one capture share a sequence
//! - **Partial is fine** - A failed or cancelled import keeps what it already did
//!
//! ## Architecture
//! The library is split into a core engine and a thin command-line front end:
//! - `core` - Import pipeline, hierarchy, similarity grouping, storage
//! - `events` - Event-driven progress reporting
//! - `error` - Error types with paths and names attached
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{LibraryError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point. `RUST_LOG`
/// wins when set; otherwise `verbose` picks between `debug` and `warn`.
pub fn init_tracing(verbose: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(if verbose { "picturebot=debug" } else { "warn" })
    });

    // A subscriber installed earlier (e.g. by a test harness) stays in place.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
