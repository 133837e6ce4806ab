//! # Comparator Module
//!
//! Groups pictures whose fingerprints are close in Hamming distance.
//!
//! ## How It Works
//! 1. Walk the pictures in the order given
//! 2. Put each one in the first group it is close to as a whole
//! 3. Otherwise open a new group
//!
//! ## Typical Distances (64-bit fingerprints)
//! | Distance | Meaning                     |
//! |----------|-----------------------------|
//! | 0        | Same frame or re-encode     |
//! | 1-8      | Burst shots, small changes  |
//! | 9-16     | Same scene, reframed        |
//! | 17+      | Different pictures          |

mod grouper;
mod traits;

pub use grouper::SimilarityGrouper;
pub use traits::{ComparisonStrategy, Fingerprinted, ThresholdStrategy, DEFAULT_THRESHOLD};

use crate::core::hierarchy::Picture;

/// Group pictures greedily, treating distances up to `threshold` as similar
pub fn group_similar(pictures: &[Picture], threshold: u32) -> Vec<Vec<Picture>> {
    let strategy = ThresholdStrategy::new(threshold);
    SimilarityGrouper::new(&strategy).group(pictures)
}
