//! SIMD-accelerated grayscale resizing.
//!
//! Uses fast_image_resize, which picks AVX2/NEON kernels when available.
//! The bilinear convolution it runs is deterministic for identical input.

use crate::error::ProcessingError;
use fast_image_resize::{images::Image, PixelType, ResizeOptions, Resizer};
use image::{DynamicImage, GrayImage, ImageBuffer, Luma};

/// Reusable grayscale resizer
pub struct FastResizer {
    resizer: Resizer,
}

impl FastResizer {
    pub fn new() -> Self {
        Self {
            resizer: Resizer::new(),
        }
    }

    /// Convert to grayscale, then resize to exactly `width` x `height`.
    pub fn resize_to_grayscale(
        &mut self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<GrayImage, ProcessingError> {
        let gray = image.to_luma8();
        self.resize_luma(&gray, width, height)
    }

    /// Resize a grayscale buffer to exactly `width` x `height`.
    pub fn resize_luma(
        &mut self,
        gray: &GrayImage,
        width: u32,
        height: u32,
    ) -> Result<GrayImage, ProcessingError> {
        let (src_width, src_height) = gray.dimensions();

        if src_width == 0 || src_height == 0 {
            return Err(ProcessingError::ResizeFailed(
                "source image has no pixels".to_string(),
            ));
        }

        if width == 0 || height == 0 {
            return Err(ProcessingError::ResizeFailed(format!(
                "invalid target size {}x{}",
                width, height
            )));
        }

        if (src_width, src_height) == (width, height) {
            return Ok(gray.clone());
        }

        let src_image =
            Image::from_vec_u8(src_width, src_height, gray.as_raw().clone(), PixelType::U8)
                .map_err(|e| ProcessingError::ResizeFailed(e.to_string()))?;

        let mut dst_image = Image::new(width, height, PixelType::U8);

        let options = ResizeOptions::new().resize_alg(fast_image_resize::ResizeAlg::Convolution(
            fast_image_resize::FilterType::Bilinear,
        ));

        self.resizer
            .resize(&src_image, &mut dst_image, &options)
            .map_err(|e| ProcessingError::ResizeFailed(e.to_string()))?;

        let buffer: ImageBuffer<Luma<u8>, Vec<u8>> =
            ImageBuffer::from_raw(width, height, dst_image.into_vec()).ok_or_else(|| {
                ProcessingError::ResizeFailed("resized buffer has the wrong length".to_string())
            })?;

        Ok(buffer)
    }
}

impl Default for FastResizer {
    fn default() -> Self {
        Self::new()
    }
}

/// One-off grayscale resize
pub fn resize_to_grayscale(
    image: &DynamicImage,
    width: u32,
    height: u32,
) -> Result<GrayImage, ProcessingError> {
    FastResizer::new().resize_to_grayscale(image, width, height)
}
