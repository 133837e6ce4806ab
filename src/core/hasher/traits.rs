//! Fingerprint value type and the hashing trait.

use crate::error::ProcessingError;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of differing bits between two 64-bit values.
pub fn hamming_distance(a: u64, b: u64) -> u32 {
    (a ^ b).count_ones()
}

/// A 64-bit perceptual fingerprint.
///
/// Similar images have fingerprints with a small Hamming distance.
/// Zero is reserved for "not computed" (RAW files, failed decodes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// The "not computed" fingerprint
    pub const NONE: Fingerprint = Fingerprint(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Build from big-endian hash bytes; exactly 8 bytes are required
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProcessingError> {
        let array: [u8; 8] = bytes.try_into().map_err(|_| {
            ProcessingError::ComputationFailed(format!(
                "expected a 64-bit hash, got {} bytes",
                bytes.len()
            ))
        })?;
        Ok(Self(u64::from_be_bytes(array)))
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn is_computed(&self) -> bool {
        self.0 != 0
    }

    /// Hamming distance to another fingerprint (0-64)
    pub fn distance(&self, other: &Fingerprint) -> u32 {
        hamming_distance(self.0, other.0)
    }

    /// Similarity as a percentage (0-100)
    pub fn similarity(&self, other: &Fingerprint) -> f64 {
        (1.0 - self.distance(other) as f64 / 64.0) * 100.0
    }

    pub fn to_hex(&self) -> String {
        format!("{:016x}", self.0)
    }
}

impl From<u64> for Fingerprint {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Available hash algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithmKind {
    /// Average Hash (aHash) - Fast, good for exact duplicates
    Average,
    /// Difference Hash (dHash) - Good balance of speed and accuracy
    #[default]
    Difference,
    /// Perceptual Hash (pHash) - DCT-based, robust to edits
    Perceptual,
}

impl fmt::Display for HashAlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithmKind::Average => write!(f, "aHash"),
            HashAlgorithmKind::Difference => write!(f, "dHash"),
            HashAlgorithmKind::Perceptual => write!(f, "pHash"),
        }
    }
}

/// Trait for 64-bit hash algorithm implementations.
///
/// Implementations must be deterministic: the same pixels always give
/// the same fingerprint.
pub trait HashAlgorithm: Send + Sync {
    /// Compute a fingerprint from decoded pixels
    fn hash_image(&self, image: &DynamicImage) -> Result<Fingerprint, ProcessingError>;

    /// Get the algorithm kind
    fn kind(&self) -> HashAlgorithmKind;
}

/// Pack row-major bits, most significant first, into a fingerprint.
pub(crate) fn pack_bits(bits: impl IntoIterator<Item = bool>) -> Fingerprint {
    let value = bits
        .into_iter()
        .take(64)
        .fold(0u64, |acc, bit| (acc << 1) | bit as u64);
    Fingerprint(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_self_is_zero() {
        for value in [0u64, 1, 0xDEAD_BEEF, u64::MAX] {
            assert_eq!(hamming_distance(value, value), 0);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let a = 0xFF00_FF00_0000_0001u64;
        let b = 0x0F0F_0000_1234_0000u64;
        assert_eq!(hamming_distance(a, b), hamming_distance(b, a));
    }

    #[test]
    fn distance_is_bounded_by_width() {
        assert_eq!(hamming_distance(0, u64::MAX), 64);
        assert_eq!(hamming_distance(0, 1), 1);
        assert_eq!(hamming_distance(0b1011, 0), 3);
    }

    #[test]
    fn fingerprint_from_bytes_needs_eight() {
        let fp = Fingerprint::from_bytes(&[0, 0, 0, 0, 0, 0, 1, 0]).unwrap();
        assert_eq!(fp.value(), 256);
        assert!(Fingerprint::from_bytes(&[1, 2, 3]).is_err());
    }

    #[test]
    fn zero_means_not_computed() {
        assert!(!Fingerprint::NONE.is_computed());
        assert!(Fingerprint::new(7).is_computed());
    }

    #[test]
    fn to_hex_is_fixed_width() {
        assert_eq!(Fingerprint::new(0xBEEF).to_hex(), "000000000000beef");
    }

    #[test]
    fn similarity_bounds() {
        let a = Fingerprint::new(0);
        let b = Fingerprint::new(u64::MAX);
        assert_eq!(a.similarity(&a), 100.0);
        assert_eq!(a.similarity(&b), 0.0);
    }

    #[test]
    fn pack_bits_is_msb_first() {
        let mut bits = vec![false; 64];
        bits[0] = true;
        bits[63] = true;
        assert_eq!(pack_bits(bits).value(), (1u64 << 63) | 1);
    }

    #[test]
    fn algorithm_kind_display() {
        assert_eq!(HashAlgorithmKind::Average.to_string(), "aHash");
        assert_eq!(HashAlgorithmKind::Difference.to_string(), "dHash");
        assert_eq!(HashAlgorithmKind::Perceptual.to_string(), "pHash");
    }
}
