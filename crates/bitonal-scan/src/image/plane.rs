// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image planes: the grayscale input every stage works on, and the bilevel
// output handed to the archive encoders.

use bitonal_core::error::{BitonalError, Result};
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use tracing::{debug, instrument};

/// Sample value of a foreground (ink) pixel in a [`BinaryPlane`].
pub const INK: u8 = 0;
/// Sample value of a background (paper) pixel in a [`BinaryPlane`].
pub const PAPER: u8 = 255;

/// A non-empty single-channel 8-bit image.
///
/// Colour input is reduced with BT.601 luma weights, so the plane matches
/// what most document tooling calls "grayscale".
#[derive(Debug, Clone, PartialEq)]
pub struct GrayPlane {
    image: GrayImage,
}

impl GrayPlane {
    // -- Construction ---------------------------------------------------------

    /// Wrap an existing grayscale buffer.
    pub fn from_luma(image: GrayImage) -> Result<Self> {
        ensure_non_empty(image.width(), image.height())?;
        Ok(Self { image })
    }

    /// Build a plane from a raw interleaved buffer with 1, 3 or 4 channels.
    ///
    /// Three- and four-channel buffers are read as RGB / RGBA; alpha is
    /// ignored.
    pub fn from_raw(width: u32, height: u32, channels: u8, data: &[u8]) -> Result<Self> {
        ensure_non_empty(width, height)?;
        let pixels = width as usize * height as usize;
        let expected = pixels * channels as usize;
        if data.len() != expected {
            return Err(BitonalError::invalid(format!(
                "buffer holds {} bytes, expected {expected} for {width}x{height}x{channels}",
                data.len()
            )));
        }

        let samples = match channels {
            1 => data.to_vec(),
            3 | 4 => data
                .chunks_exact(channels as usize)
                .map(|px| luma_bt601(px[0], px[1], px[2]))
                .collect(),
            other => {
                return Err(BitonalError::invalid(format!(
                    "unsupported channel count {other}, expected 1, 3 or 4"
                )));
            }
        };

        let image = GrayImage::from_raw(width, height, samples)
            .ok_or_else(|| BitonalError::invalid("buffer does not match dimensions"))?;
        Ok(Self { image })
    }

    /// Reduce an already-decoded image to a grayscale plane.
    pub fn from_dynamic(image: &DynamicImage) -> Result<Self> {
        ensure_non_empty(image.width(), image.height())?;
        let gray = match image {
            DynamicImage::ImageLuma8(gray) => gray.clone(),
            DynamicImage::ImageLumaA8(_) | DynamicImage::ImageLuma16(_) | DynamicImage::ImageLumaA16(_) => {
                image.to_luma8()
            }
            _ => {
                let rgb = image.to_rgb8();
                GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
                    let Rgb([r, g, b]) = *rgb.get_pixel(x, y);
                    Luma([luma_bt601(r, g, b)])
                })
            }
        };
        Ok(Self { image: gray })
    }

    /// Decode an encoded image (JPEG, PNG, TIFF, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(data)
            .map_err(|err| BitonalError::ImageDecode(format!("failed to decode image: {err}")))?;
        debug!(
            width = decoded.width(),
            height = decoded.height(),
            "Image decoded from bytes"
        );
        Self::from_dynamic(&decoded)
    }

    /// Load and decode an image file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let decoded = image::open(path.as_ref()).map_err(|err| {
            BitonalError::ImageDecode(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        debug!(
            width = decoded.width(),
            height = decoded.height(),
            "Image loaded"
        );
        Self::from_dynamic(&decoded)
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying grayscale buffer.
    pub fn as_luma(&self) -> &GrayImage {
        &self.image
    }

    /// Consume the plane and return the underlying buffer.
    pub fn into_luma(self) -> GrayImage {
        self.image
    }
}

/// A plane whose samples are all [`INK`] or [`PAPER`].
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryPlane {
    image: GrayImage,
}

impl BinaryPlane {
    /// Validate that every sample of `image` is 0 or 255.
    ///
    /// Any other value means an upstream stage failed; the first offending
    /// pixel is reported.
    pub fn new(image: GrayImage) -> Result<Self> {
        ensure_non_empty(image.width(), image.height())?;
        if let Some((x, y, px)) = image
            .enumerate_pixels()
            .find(|(_, _, px)| px.0[0] != INK && px.0[0] != PAPER)
        {
            return Err(BitonalError::NotBilevel {
                x,
                y,
                value: px.0[0],
            });
        }
        Ok(Self { image })
    }

    /// Wrap a buffer produced by a stage that only writes `INK`/`PAPER`.
    pub(crate) fn from_stage(image: GrayImage) -> Self {
        debug_assert!(image.pixels().all(|p| p.0[0] == INK || p.0[0] == PAPER));
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// `true` when the pixel at `(x, y)` is ink.
    pub fn is_ink(&self, x: u32, y: u32) -> bool {
        self.image.get_pixel(x, y).0[0] == INK
    }

    /// Number of ink pixels.
    pub fn ink_count(&self) -> usize {
        self.image.as_raw().iter().filter(|&&v| v == INK).count()
    }

    /// Number of paper pixels.
    pub fn paper_count(&self) -> usize {
        self.image.as_raw().len() - self.ink_count()
    }

    pub fn as_luma(&self) -> &GrayImage {
        &self.image
    }

    pub fn into_luma(self) -> GrayImage {
        self.image
    }

    /// Expand to a three-channel image for display.
    pub fn to_rgb(&self) -> RgbImage {
        RgbImage::from_fn(self.width(), self.height(), |x, y| {
            let v = self.image.get_pixel(x, y).0[0];
            Rgb([v, v, v])
        })
    }

    /// Downscaled copy whose longer side is at most `max_side`.
    ///
    /// Smaller planes are returned unchanged. The result is a grayscale
    /// preview and is no longer strictly bilevel.
    pub fn preview(&self, max_side: u32) -> GrayImage {
        let longest = self.width().max(self.height());
        if max_side == 0 || longest <= max_side {
            return self.image.clone();
        }
        let scale = max_side as f64 / longest as f64;
        let w = ((self.width() as f64 * scale) as u32).max(1);
        let h = ((self.height() as f64 * scale) as u32).max(1);
        image::imageops::resize(&self.image, w, h, image::imageops::FilterType::Lanczos3)
    }
}

/// BT.601 luma, rounded to nearest.
pub fn luma_bt601(r: u8, g: u8, b: u8) -> u8 {
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32 + 500) / 1000) as u8
}

fn ensure_non_empty(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(BitonalError::invalid(format!(
            "image must be non-empty, got {width}x{height}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn raw_rgb_uses_bt601_weights() {
        let data = [255, 0, 0, 0, 255, 0, 0, 0, 255];
        let plane = GrayPlane::from_raw(3, 1, 3, &data).unwrap();
        let values: Vec<u8> = plane.as_luma().as_raw().clone();
        assert_eq!(values, vec![76, 150, 29]);
    }

    #[test]
    fn raw_rgba_ignores_alpha() {
        let data = [10, 10, 10, 0, 200, 200, 200, 255];
        let plane = GrayPlane::from_raw(2, 1, 4, &data).unwrap();
        assert_eq!(plane.as_luma().as_raw(), &vec![10, 200]);
    }

    #[test]
    fn raw_rejects_empty_and_mismatched_buffers() {
        assert!(GrayPlane::from_raw(0, 4, 1, &[]).is_err());
        assert!(GrayPlane::from_raw(2, 2, 1, &[0; 3]).is_err());
        assert!(GrayPlane::from_raw(1, 1, 2, &[0; 2]).is_err());
    }

    #[test]
    fn dynamic_colour_matches_raw_conversion() {
        let rgba = RgbaImage::from_pixel(4, 3, image::Rgba([30, 120, 220, 255]));
        let plane = GrayPlane::from_dynamic(&DynamicImage::ImageRgba8(rgba)).unwrap();
        let expected = luma_bt601(30, 120, 220);
        assert!(plane.as_luma().pixels().all(|p| p.0[0] == expected));
    }

    #[test]
    fn undecodable_bytes_are_decode_errors() {
        let err = GrayPlane::from_bytes(b"not an image").unwrap_err();
        assert!(matches!(err, BitonalError::ImageDecode(_)));
    }

    #[test]
    fn binary_plane_rejects_grey_values() {
        let mut img = GrayImage::from_pixel(3, 3, Luma([PAPER]));
        img.put_pixel(2, 1, Luma([128]));
        match BinaryPlane::new(img) {
            Err(BitonalError::NotBilevel { x, y, value }) => {
                assert_eq!((x, y, value), (2, 1, 128));
            }
            other => panic!("expected NotBilevel, got {other:?}"),
        }
    }

    #[test]
    fn binary_plane_counts() {
        let mut img = GrayImage::from_pixel(4, 4, Luma([PAPER]));
        img.put_pixel(0, 0, Luma([INK]));
        img.put_pixel(3, 3, Luma([INK]));
        let plane = BinaryPlane::new(img).unwrap();
        assert_eq!(plane.ink_count(), 2);
        assert_eq!(plane.paper_count(), 14);
        assert!(plane.is_ink(3, 3));
        assert!(!plane.is_ink(1, 1));
        assert_eq!(plane.to_rgb().get_pixel(0, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn preview_keeps_aspect_ratio() {
        let plane = BinaryPlane::new(GrayImage::from_pixel(800, 200, Luma([PAPER]))).unwrap();
        let small = plane.preview(400);
        assert_eq!(small.dimensions(), (400, 100));
        assert_eq!(plane.preview(1000).dimensions(), (800, 200));
    }
}
