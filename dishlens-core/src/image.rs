//! Upload validation for food photos.
//!
//! Checks run before anything is sent to the recognition service, in a fixed
//! order: byte size, format, decodability, then pixel dimensions.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{ImageFormat, ImageReader};
use thiserror::Error;

use crate::ai::InlineImage;
use crate::locale::Message;

/// Formats the recognition service accepts.
pub const ALLOWED_FORMATS: &[ImageFormat] = &[ImageFormat::Jpeg, ImageFormat::Png];

/// Maximum upload size (4MB).
pub const MAX_FILE_SIZE: usize = 4 * 1024 * 1024;

/// Smallest allowed width or height, in pixels.
pub const MIN_DIMENSION: u32 = 100;

/// Largest allowed width or height, in pixels.
pub const MAX_DIMENSION: u32 = 4096;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("Image too large: {size} bytes (max 4MB)")]
    TooLarge { size: usize },

    #[error("Unsupported image format: {0}. Allowed: JPEG, PNG")]
    UnsupportedType(String),

    #[error("Image too small: {width}x{height} (min 100x100)")]
    TooSmall { width: u32, height: u32 },

    #[error("Image too large: {width}x{height} (max 4096x4096)")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("Failed to read image: {0}")]
    Unreadable(String),
}

impl ImageError {
    pub fn message(&self) -> Message {
        match self {
            ImageError::TooLarge { .. } => Message::ImageTooLarge,
            ImageError::UnsupportedType(_) => Message::UnsupportedImageType,
            ImageError::TooSmall { .. } => Message::ImageTooSmall,
            ImageError::DimensionsTooLarge { .. } => Message::ImageDimensionsTooLarge,
            ImageError::Unreadable(_) => Message::ImageUnreadable,
        }
    }
}

/// An upload that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedImage {
    pub data: Vec<u8>,
    /// "image/jpeg" or "image/png", detected from the bytes.
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
}

impl ValidatedImage {
    /// Base64 form for embedding in a recognition request.
    pub fn inline(&self) -> InlineImage {
        InlineImage {
            mime_type: self.mime_type.to_string(),
            base64_data: STANDARD.encode(&self.data),
        }
    }
}

/// Validate an uploaded image. The format is sniffed from the data; any
/// filename or declared content type is ignored.
pub fn validate_upload(data: Vec<u8>) -> Result<ValidatedImage, ImageError> {
    if data.len() > MAX_FILE_SIZE {
        return Err(ImageError::TooLarge { size: data.len() });
    }

    let reader = ImageReader::new(Cursor::new(data.as_slice()))
        .with_guessed_format()
        .map_err(|e| ImageError::Unreadable(e.to_string()))?;

    let format = match reader.format() {
        Some(format) if ALLOWED_FORMATS.contains(&format) => format,
        Some(other) => return Err(ImageError::UnsupportedType(format!("{:?}", other))),
        None => return Err(ImageError::UnsupportedType("unknown".to_string())),
    };

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| ImageError::Unreadable(e.to_string()))?;

    if width < MIN_DIMENSION || height < MIN_DIMENSION {
        return Err(ImageError::TooSmall { width, height });
    }
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(ImageError::DimensionsTooLarge { width, height });
    }

    tracing::debug!(
        format = ?format,
        width,
        height,
        bytes = data.len(),
        "validated upload"
    );

    Ok(ValidatedImage {
        data,
        mime_type: format.to_mime_type(),
        width,
        height,
    })
}

#[cfg(test)]
pub(crate) fn encode_test_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(width, height));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).expect("encode test image");
    buf.into_inner()
}
