//! # Hasher Module
//!
//! Decodes images and computes 64-bit perceptual fingerprints.
//!
//! ## Supported Algorithms
//! - **dHash (Difference Hash)** - Best balance of speed and accuracy (default)
//! - **aHash (Average Hash)** - Fastest, good for exact duplicates
//! - **pHash (Perceptual Hash)** - Most robust, handles edits well
//!
//! ## How It Works
//! 1. Shrink the image to a tiny grayscale grid
//! 2. Derive one bit per cell from pixel relationships
//! 3. Compare fingerprints using Hamming distance
//!
//! Only the distance-preserving property is relied on; fingerprints are
//! not meant to match other tools bit for bit.
//!
//! ## Example
//! ```rust,ignore
//! use picturebot::core::hasher::{FastDecoder, HasherConfig, HashAlgorithmKind, ImageDecoder};
//!
//! let hasher = HasherConfig::new()
//!     .algorithm(HashAlgorithmKind::Difference)
//!     .build();
//!
//! let image = FastDecoder.decode(&path)?;
//! let fingerprint = hasher.hash_image(&image)?;
//! ```

mod algorithms;
pub mod fast_decode;
pub mod fast_resize;
mod traits;

pub use algorithms::{AverageHasher, DifferenceHasher, PerceptualHasher};
pub use fast_decode::{FastDecoder, ImageDecoder};
pub use fast_resize::FastResizer;
pub use traits::{hamming_distance, Fingerprint, HashAlgorithm, HashAlgorithmKind};

/// Configuration builder for hashers
#[derive(Debug, Clone, Default)]
pub struct HasherConfig {
    algorithm: HashAlgorithmKind,
}

impl HasherConfig {
    /// Create a new hasher configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hash algorithm
    pub fn algorithm(mut self, algorithm: HashAlgorithmKind) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Build the hasher
    pub fn build(self) -> Box<dyn HashAlgorithm> {
        match self.algorithm {
            HashAlgorithmKind::Average => Box::new(AverageHasher::new()),
            HashAlgorithmKind::Difference => Box::new(DifferenceHasher::new()),
            HashAlgorithmKind::Perceptual => Box::new(PerceptualHasher::new()),
        }
    }
}
