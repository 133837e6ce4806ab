//! Difference Hash (dHash) implementation.
//!
//! dHash works by:
//! 1. Shrinking the image to a 9x8 grayscale grid
//! 2. Comparing each cell to the one on its right
//! 3. Setting the bit when the left cell is brighter
//!
//! This captures the relative gradient of brightness changes.

use super::super::fast_resize::resize_to_grayscale;
use super::super::traits::{pack_bits, Fingerprint, HashAlgorithm, HashAlgorithmKind};
use super::GRID;
use crate::error::ProcessingError;
use image::DynamicImage;

/// Difference Hash (dHash) implementation
#[derive(Debug, Default)]
pub struct DifferenceHasher;

impl DifferenceHasher {
    pub fn new() -> Self {
        Self
    }
}

impl HashAlgorithm for DifferenceHasher {
    fn hash_image(&self, image: &DynamicImage) -> Result<Fingerprint, ProcessingError> {
        // One extra column to compute differences
        let gray = resize_to_grayscale(image, GRID + 1, GRID)?;

        let bits = (0..GRID).flat_map(|y| {
            let gray = &gray;
            (0..GRID).map(move |x| gray.get_pixel(x, y)[0] > gray.get_pixel(x + 1, y)[0])
        });

        Ok(pack_bits(bits))
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::Difference
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use super::*;

    #[test]
    fn identical_images_produce_identical_hash() {
        let hasher = DifferenceHasher::new();
        let image = fixtures::squares(0);

        assert_eq!(
            hasher.hash_image(&image).unwrap(),
            hasher.hash_image(&image).unwrap()
        );
    }

    #[test]
    fn opposite_gradients_are_far_apart() {
        let hasher = DifferenceHasher::new();

        // Bright-on-the-right sets no bits; bright-on-the-left sets all of them
        let rising = hasher.hash_image(&fixtures::ramp(false)).unwrap();
        let falling = hasher.hash_image(&fixtures::ramp(true)).unwrap();

        assert!(
            rising.distance(&falling) > 48,
            "expected opposite gradients to differ, got {}",
            rising.distance(&falling)
        );
    }

    #[test]
    fn brightness_shift_keeps_hash_close() {
        let hasher = DifferenceHasher::new();
        let a = hasher.hash_image(&fixtures::squares(0)).unwrap();
        let b = hasher.hash_image(&fixtures::squares(25)).unwrap();

        assert!(a.distance(&b) <= 4, "distance {}", a.distance(&b));
    }

    #[test]
    fn kind_returns_difference() {
        assert_eq!(DifferenceHasher::new().kind(), HashAlgorithmKind::Difference);
    }
}
