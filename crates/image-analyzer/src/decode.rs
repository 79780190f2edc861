//! Decoding encoded uploads into pixel grids
//!
//! The decoder sniffs the container format from the leading bytes, so the filename the
//! caller supplies is never consulted. Every analyzer works from the two views built
//! here: 8-bit RGB and 8-bit luma.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageReader, Luma, RgbImage};
use tracing::debug;

use crate::error::AnalysisError;

/// Encoded image bytes as received from the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    bytes: Vec<u8>,
}

impl ImageBuffer {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<Vec<u8>> for ImageBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for ImageBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes.to_vec())
    }
}

/// A decoded image with color and grayscale views of identical dimensions.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    color: RgbImage,
    gray: GrayImage,
}

impl DecodedImage {
    /// Build both views from an RGB grid.
    pub fn from_rgb(color: RgbImage) -> Self {
        let gray = to_gray(&color);
        Self { color, gray }
    }

    /// Reduce any decoded layout (alpha, 16-bit, float) to the two 8-bit views.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self::from_rgb(image.to_rgb8())
    }

    pub fn width(&self) -> u32 {
        self.color.width()
    }

    pub fn height(&self) -> u32 {
        self.color.height()
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    pub fn color(&self) -> &RgbImage {
        &self.color
    }

    pub fn gray(&self) -> &GrayImage {
        &self.gray
    }

    /// Fails for a grid with no pixels, which no analyzer can summarize.
    pub fn ensure_area(&self) -> Result<(), AnalysisError> {
        if self.pixel_count() == 0 {
            return Err(AnalysisError::EmptyGrid {
                width: self.width(),
                height: self.height(),
            });
        }
        Ok(())
    }
}

/// Decode a buffer into a [`DecodedImage`].
///
/// Any format the `image` crate recognizes is accepted; JPEG and PNG are always
/// available. The reader's default allocation limits bound the work per request.
pub fn decode(buffer: &ImageBuffer) -> Result<DecodedImage, AnalysisError> {
    if buffer.is_empty() {
        return Err(AnalysisError::EmptyBuffer);
    }

    let reader = ImageReader::new(Cursor::new(buffer.as_bytes())).with_guessed_format()?;
    let format = reader.format();
    let image = reader.decode()?;

    debug!(
        ?format,
        width = image.width(),
        height = image.height(),
        "decoded image"
    );

    Ok(DecodedImage::from_dynamic(image))
}

/// ITU-R BT.601 luma in 14-bit fixed point: 0.299 R + 0.587 G + 0.114 B, rounded.
fn to_gray(color: &RgbImage) -> GrayImage {
    const R_WEIGHT: u32 = 4899;
    const G_WEIGHT: u32 = 9617;
    const B_WEIGHT: u32 = 1868;
    const SHIFT: u32 = 14;
    const HALF: u32 = 1 << (SHIFT - 1);

    GrayImage::from_fn(color.width(), color.height(), |x, y| {
        let [r, g, b] = color.get_pixel(x, y).0;
        let luma = u32::from(r) * R_WEIGHT + u32::from(g) * G_WEIGHT + u32::from(b) * B_WEIGHT;
        // Weights sum to 1 << SHIFT, so the result never exceeds 255
        Luma([((luma + HALF) >> SHIFT) as u8])
    })
}
