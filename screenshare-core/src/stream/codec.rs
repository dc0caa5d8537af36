//! Frame image codecs.
//!
//! The wire carries whatever bytes the codec produced; the receiver
//! sniffs the format from the payload, so a sender can switch between
//! JPEG and PNG without telling the receiver.

use std::fmt;
use std::str::FromStr;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use serde::{Deserialize, Serialize};

use crate::error::ShareError;

/// Default JPEG quality.
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Encoded image format on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Compression {
    #[default]
    #[serde(rename = "jpg", alias = "jpeg")]
    Jpeg,
    #[serde(rename = "png")]
    Png,
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compression::Jpeg => f.write_str("jpg"),
            Compression::Png => f.write_str("png"),
        }
    }
}

impl FromStr for Compression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(Compression::Jpeg),
            "png" => Ok(Compression::Png),
            other => Err(format!("unknown compression '{other}' (expected jpg or png)")),
        }
    }
}

/// Encode / decode one frame.
pub trait FrameCodec {
    fn encode(&self, image: &RgbImage) -> Result<Vec<u8>, ShareError>;
    fn decode(&self, data: &[u8]) -> Result<RgbImage, ShareError>;
}

/// [`FrameCodec`] backed by the `image` crate.
#[derive(Debug, Clone, Copy)]
pub struct ImageCodec {
    compression: Compression,
    jpeg_quality: u8,
}

impl ImageCodec {
    pub fn new(compression: Compression) -> Self {
        Self {
            compression,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Override the JPEG quality (clamped to `1..=100`).
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }
}

impl Default for ImageCodec {
    fn default() -> Self {
        Self::new(Compression::default())
    }
}

impl FrameCodec for ImageCodec {
    fn encode(&self, image: &RgbImage) -> Result<Vec<u8>, ShareError> {
        let (w, h) = image.dimensions();
        let mut out = Vec::new();
        match self.compression {
            Compression::Jpeg => JpegEncoder::new_with_quality(&mut out, self.jpeg_quality)
                .write_image(image.as_raw(), w, h, ExtendedColorType::Rgb8)?,
            Compression::Png => {
                PngEncoder::new_with_quality(&mut out, CompressionType::Fast, FilterType::Adaptive)
                    .write_image(image.as_raw(), w, h, ExtendedColorType::Rgb8)?
            }
        }
        Ok(out)
    }

    fn decode(&self, data: &[u8]) -> Result<RgbImage, ShareError> {
        Ok(image::load_from_memory(data)?.to_rgb8())
    }
}
