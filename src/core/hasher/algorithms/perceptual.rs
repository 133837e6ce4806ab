//! Perceptual Hash (pHash) implementation.
//!
//! pHash uses the Discrete Cosine Transform (DCT) to extract the low
//! frequencies of the image, which makes it robust to scaling, small
//! brightness/contrast changes and compression artifacts.
//!
//! The DCT itself comes from the image_hasher crate.

use super::super::traits::{Fingerprint, HashAlgorithm, HashAlgorithmKind};
use super::GRID;
use crate::error::ProcessingError;
use image::DynamicImage;
use image_hasher::{HashAlg, HasherConfig as ImageHasherConfig};

/// Perceptual Hash (pHash) implementation using DCT
pub struct PerceptualHasher {
    hasher: image_hasher::Hasher,
}

impl PerceptualHasher {
    pub fn new() -> Self {
        let hasher = ImageHasherConfig::new()
            .hash_size(GRID, GRID)
            .hash_alg(HashAlg::Mean)
            .preproc_dct()
            .to_hasher();

        Self { hasher }
    }
}

impl Default for PerceptualHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl HashAlgorithm for PerceptualHasher {
    fn hash_image(&self, image: &DynamicImage) -> Result<Fingerprint, ProcessingError> {
        let hash = self.hasher.hash_image(image);
        Fingerprint::from_bytes(hash.as_bytes())
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::Perceptual
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use super::*;

    #[test]
    fn identical_images_produce_identical_hash() {
        let hasher = PerceptualHasher::new();
        let image = fixtures::squares(0);

        assert_eq!(
            hasher.hash_image(&image).unwrap(),
            hasher.hash_image(&image).unwrap()
        );
    }

    #[test]
    fn similar_images_produce_similar_hash() {
        let hasher = PerceptualHasher::new();

        let a = hasher.hash_image(&fixtures::squares(0)).unwrap();
        let b = hasher.hash_image(&fixtures::squares(5)).unwrap();

        assert!(a.distance(&b) < 10, "distance {}", a.distance(&b));
    }

    #[test]
    fn kind_returns_perceptual() {
        assert_eq!(PerceptualHasher::new().kind(), HashAlgorithmKind::Perceptual);
    }
}
