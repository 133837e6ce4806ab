//! Trait definitions for similarity strategies.

use crate::core::hasher::Fingerprint;
use crate::core::hierarchy::Picture;

/// Default maximum Hamming distance for two pictures to count as similar
pub const DEFAULT_THRESHOLD: u32 = 8;

/// Anything carrying a 64-bit perceptual fingerprint
pub trait Fingerprinted {
    fn fingerprint(&self) -> Fingerprint;
}

impl Fingerprinted for Picture {
    fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }
}

impl Fingerprinted for Fingerprint {
    fn fingerprint(&self) -> Fingerprint {
        *self
    }
}

/// Strategy trait for deciding whether two fingerprints are similar
pub trait ComparisonStrategy: Send + Sync {
    /// Whether a Hamming distance counts as similar
    fn is_similar(&self, distance: u32) -> bool;
}

/// Simple threshold-based comparison strategy
#[derive(Debug, Clone, Copy)]
pub struct ThresholdStrategy {
    /// Maximum distance still considered similar
    threshold: u32,
}

impl ThresholdStrategy {
    /// Create a new threshold strategy
    ///
    /// Recommended thresholds:
    /// - 5: Conservative, near-identical frames only
    /// - 8: Balanced (default)
    /// - 12: Permissive, catches reframed bursts
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }
}

impl ComparisonStrategy for ThresholdStrategy {
    fn is_similar(&self, distance: u32) -> bool {
        distance <= self.threshold
    }
}
