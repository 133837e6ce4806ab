//! Image decoding with a fast path for JPEG.
//!
//! Uses zune-jpeg for JPEG files (1.5-2x faster than the image crate)
//! and falls back to the image crate for everything else.

use crate::error::ProcessingError;
use image::{DynamicImage, ImageBuffer, Luma, Rgb, Rgba};
use std::fs;
use std::path::Path;
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

/// Image-decode capability used by the importer.
///
/// The returned image keeps its color channels; callers convert to
/// grayscale when they need it.
pub trait ImageDecoder: Send + Sync {
    fn decode(&self, path: &Path) -> Result<DynamicImage, ProcessingError>;
}

fn is_jpeg(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("jpg" | "jpeg")
    )
}

/// Decoder that picks the fastest available backend per format
#[derive(Debug, Clone, Copy, Default)]
pub struct FastDecoder;

impl FastDecoder {
    /// Fast JPEG decoding using zune-jpeg
    fn decode_jpeg(path: &Path) -> Result<DynamicImage, ProcessingError> {
        let file_bytes = fs::read(path).map_err(|e| ProcessingError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let options = DecoderOptions::new_fast().jpeg_set_out_colorspace(ColorSpace::RGB);
        let mut decoder = JpegDecoder::new_with_options(&file_bytes, options);

        let pixels = decoder.decode().map_err(|e| ProcessingError::DecodeError {
            path: path.to_path_buf(),
            reason: format!("zune-jpeg decode failed: {:?}", e),
        })?;

        let info = decoder.info().ok_or_else(|| ProcessingError::DecodeError {
            path: path.to_path_buf(),
            reason: "missing JPEG header info".to_string(),
        })?;

        let width = info.width as u32;
        let height = info.height as u32;
        if width == 0 || height == 0 {
            return Err(ProcessingError::EmptyImage {
                path: path.to_path_buf(),
            });
        }

        let buffer_error = || ProcessingError::DecodeError {
            path: path.to_path_buf(),
            reason: "decoded buffer does not match image size".to_string(),
        };

        let image = match decoder.get_output_colorspace().unwrap_or(ColorSpace::RGB) {
            ColorSpace::RGB => {
                let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
                    ImageBuffer::from_raw(width, height, pixels).ok_or_else(buffer_error)?;
                DynamicImage::ImageRgb8(buffer)
            }
            ColorSpace::RGBA => {
                let buffer: ImageBuffer<Rgba<u8>, Vec<u8>> =
                    ImageBuffer::from_raw(width, height, pixels).ok_or_else(buffer_error)?;
                DynamicImage::ImageRgba8(buffer)
            }
            ColorSpace::Luma => {
                let buffer: ImageBuffer<Luma<u8>, Vec<u8>> =
                    ImageBuffer::from_raw(width, height, pixels).ok_or_else(buffer_error)?;
                DynamicImage::ImageLuma8(buffer)
            }
            _ => return Self::decode_fallback(path),
        };

        Ok(image)
    }

    fn decode_fallback(path: &Path) -> Result<DynamicImage, ProcessingError> {
        let image = image::open(path).map_err(|e| ProcessingError::DecodeError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if image.width() == 0 || image.height() == 0 {
            return Err(ProcessingError::EmptyImage {
                path: path.to_path_buf(),
            });
        }

        Ok(image)
    }
}

impl ImageDecoder for FastDecoder {
    fn decode(&self, path: &Path) -> Result<DynamicImage, ProcessingError> {
        if is_jpeg(path) {
            Self::decode_jpeg(path).or_else(|_| Self::decode_fallback(path))
        } else {
            Self::decode_fallback(path)
        }
    }
}
