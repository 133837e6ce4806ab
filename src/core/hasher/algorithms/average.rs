//! Average Hash (aHash) implementation.
//!
//! aHash works by:
//! 1. Shrinking the image to an 8x8 grayscale grid
//! 2. Computing the average brightness
//! 3. For each cell: 1 if brighter than average, else 0
//!
//! This is the fastest hash but the least robust to edits.

use super::super::fast_resize::resize_to_grayscale;
use super::super::traits::{pack_bits, Fingerprint, HashAlgorithm, HashAlgorithmKind};
use super::GRID;
use crate::error::ProcessingError;
use image::DynamicImage;

/// Average Hash (aHash) implementation
#[derive(Debug, Default)]
pub struct AverageHasher;

impl AverageHasher {
    pub fn new() -> Self {
        Self
    }
}

impl HashAlgorithm for AverageHasher {
    fn hash_image(&self, image: &DynamicImage) -> Result<Fingerprint, ProcessingError> {
        let gray = resize_to_grayscale(image, GRID, GRID)?;

        let total: u64 = gray.pixels().map(|p| p[0] as u64).sum();
        let average = total / (GRID * GRID) as u64;

        Ok(pack_bits(gray.pixels().map(|p| p[0] as u64 > average)))
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::Average
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use super::*;

    #[test]
    fn identical_images_produce_identical_hash() {
        let hasher = AverageHasher::new();
        let image = fixtures::squares(0);

        assert_eq!(
            hasher.hash_image(&image).unwrap(),
            hasher.hash_image(&image).unwrap()
        );
    }

    #[test]
    fn solid_image_produces_empty_hash() {
        let hash = AverageHasher::new().hash_image(&fixtures::solid(128)).unwrap();
        assert_eq!(hash.value(), 0);
    }

    #[test]
    fn brightness_shift_keeps_hash_close() {
        let hasher = AverageHasher::new();
        let a = hasher.hash_image(&fixtures::squares(0)).unwrap();
        let b = hasher.hash_image(&fixtures::squares(20)).unwrap();

        assert!(a.distance(&b) <= 4, "distance {}", a.distance(&b));
    }

    #[test]
    fn kind_returns_average() {
        assert_eq!(AverageHasher::new().kind(), HashAlgorithmKind::Average);
    }
}
