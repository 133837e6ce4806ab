//! # Quality Analysis Module
//!
//! Scores how in-focus an image is using Sobel gradient magnitude.
//!
//! Wide images are first shrunk to a fixed width so that scores from
//! different cameras stay comparable and large files stay cheap.

use image::{DynamicImage, GrayImage};
use std::borrow::Cow;

use crate::core::hasher::FastResizer;
use crate::error::ProcessingError;

/// Width images are shrunk to before scoring
pub const DEFAULT_MAX_WIDTH: u32 = 600;

/// Sobel-based sharpness scorer
#[derive(Debug, Clone, Copy)]
pub struct SharpnessScorer {
    max_width: u32,
}

impl Default for SharpnessScorer {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
        }
    }
}

impl SharpnessScorer {
    /// Create a scorer that shrinks images wider than `max_width`
    pub fn new(max_width: u32) -> Self {
        Self {
            max_width: max_width.max(1),
        }
    }

    pub fn max_width(&self) -> u32 {
        self.max_width
    }

    /// Score a decoded image (converted to grayscale first)
    pub fn score_image(&self, image: &DynamicImage) -> Result<u32, ProcessingError> {
        self.score_gray(&image.to_luma8())
    }

    /// Score a grayscale image. Larger is sharper.
    pub fn score_gray(&self, gray: &GrayImage) -> Result<u32, ProcessingError> {
        let scaled = self.shrink(gray)?;
        Ok(sobel_mean(&scaled).round() as u32)
    }

    /// Shrink to `max_width` keeping the aspect ratio; narrower images pass through
    fn shrink<'a>(&self, gray: &'a GrayImage) -> Result<Cow<'a, GrayImage>, ProcessingError> {
        let (width, height) = gray.dimensions();
        if width <= self.max_width {
            return Ok(Cow::Borrowed(gray));
        }

        let target_height =
            ((height as f64 * self.max_width as f64 / width as f64).round() as u32).max(1);

        FastResizer::new()
            .resize_luma(gray, self.max_width, target_height)
            .map(Cow::Owned)
    }
}

/// Mean of `0.5 * |Gx| + 0.5 * |Gy|` over every pixel.
///
/// Gradients are taken at interior pixels only; border pixels count
/// as zero. Images smaller than 3x3 have no interior and score 0.
pub fn sobel_mean(gray: &GrayImage) -> f64 {
    let (width, height) = gray.dimensions();

    if width < 3 || height < 3 {
        return 0.0;
    }

    let px = |x: u32, y: u32| gray.get_pixel(x, y)[0] as i32;
    let mut total = 0.0f64;

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let gx = (px(x + 1, y - 1) + 2 * px(x + 1, y) + px(x + 1, y + 1))
                - (px(x - 1, y - 1) + 2 * px(x - 1, y) + px(x - 1, y + 1));
            let gy = (px(x - 1, y + 1) + 2 * px(x, y + 1) + px(x + 1, y + 1))
                - (px(x - 1, y - 1) + 2 * px(x, y - 1) + px(x + 1, y - 1));

            total += 0.5 * gx.abs() as f64 + 0.5 * gy.abs() as f64;
        }
    }

    total / (width as f64 * height as f64)
}
