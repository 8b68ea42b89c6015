// SPDX-License-Identifier: MPL-2.0
//! Media-side building blocks: decoded image data, type-erased page
//! identifiers, the host data-source contract and the surface loader
//! bridge.

pub mod diff;
pub mod identifier;
pub mod loader;
pub mod source;

use crate::error::Result;
use iced::widget::image;
use iced::Size;
use std::sync::Arc;

// Re-export commonly used types
pub use diff::OrderedDifference;
pub use identifier::MediaId;
pub use loader::{LoadToken, SurfaceLoader, ThumbnailCache};
pub use source::{ImageTransition, MediaPayload, MediaSource};

/// Decoded RGBA image plus the widget handle displaying it.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub handle: image::Handle,
    pub width: u32,
    pub height: u32,
    /// Original RGBA bytes, shared to keep clones cheap.
    rgba_bytes: Arc<Vec<u8>>,
}

impl ImageData {
    /// Creates a new `ImageData` from RGBA pixels.
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        let rgba_bytes = Arc::new(pixels);
        let handle = image::Handle::from_rgba(width, height, rgba_bytes.to_vec());
        Self {
            handle,
            width,
            height,
            rgba_bytes,
        }
    }

    /// Decodes encoded bytes (PNG, JPEG, ...) into an `ImageData`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`](crate::error::Error::Decode) when the
    /// bytes are not a supported image format.
    pub fn from_encoded(encoded_bytes: &[u8]) -> Result<Self> {
        let decoded = image_rs::load_from_memory(encoded_bytes)?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self::from_rgba(width, height, rgba.into_raw()))
    }

    /// Returns a reference to the original RGBA bytes.
    pub fn rgba_bytes(&self) -> &[u8] {
        &self.rgba_bytes
    }

    /// Intrinsic size in pixels.
    #[allow(clippy::cast_precision_loss)] // u32 to f32 for dimensions: f32 is exact up to 16M
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }

    /// Aspect ratio (width / height), or `None` for degenerate images.
    #[allow(clippy::cast_precision_loss)] // u32 to f32 for dimensions: f32 is exact up to 16M
    #[must_use]
    pub fn aspect_ratio(&self) -> Option<f32> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some(self.width as f32 / self.height as f32)
    }

    /// Approximate in-memory size of the RGBA payload, for cache budgets.
    #[must_use]
    pub fn byte_size(&self) -> usize {
        self.rgba_bytes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgba_records_dimensions() {
        let data = ImageData::from_rgba(2, 3, vec![0_u8; 2 * 3 * 4]);
        assert_eq!(data.width, 2);
        assert_eq!(data.height, 3);
        assert_eq!(data.byte_size(), 24);
    }

    #[test]
    fn aspect_ratio_is_width_over_height() {
        use crate::test_utils::assert_abs_diff_eq;
        let data = ImageData::from_rgba(4, 2, vec![0_u8; 4 * 2 * 4]);
        assert_abs_diff_eq!(data.aspect_ratio().expect("ratio"), 2.0);
    }

    #[test]
    fn aspect_ratio_of_degenerate_image_is_none() {
        let data = ImageData::from_rgba(0, 2, Vec::new());
        assert!(data.aspect_ratio().is_none());
    }

    #[test]
    fn from_encoded_rejects_garbage() {
        assert!(ImageData::from_encoded(b"definitely not an image").is_err());
    }

    #[test]
    fn from_encoded_decodes_png() {
        // Encode a 2x1 RGBA image through the image crate, then decode it back.
        let mut encoded = Vec::new();
        let img = image_rs::RgbaImage::from_raw(2, 1, vec![255, 0, 0, 255, 0, 255, 0, 255])
            .expect("raw image");
        image_rs::DynamicImage::ImageRgba8(img)
            .write_to(
                &mut std::io::Cursor::new(&mut encoded),
                image_rs::ImageFormat::Png,
            )
            .expect("encode png");

        let data = ImageData::from_encoded(&encoded).expect("decode png");
        assert_eq!(data.width, 2);
        assert_eq!(data.height, 1);
        assert_eq!(data.rgba_bytes()[0], 255);
    }
}
