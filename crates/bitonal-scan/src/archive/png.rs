// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Lossless PNG output.

use bitonal_core::error::{BitonalError, Result};
use bitonal_core::types::ArtifactFormat;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};

use crate::image::BinaryPlane;

/// Encode a bilevel plane as 8-bit grayscale PNG at maximum compression.
///
/// Only the values 0 and 255 occur, so decoding reproduces the plane
/// exactly.
pub fn encode_png(plane: &BinaryPlane) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, FilterType::Adaptive);
    encoder
        .write_image(
            plane.as_luma().as_raw(),
            plane.width(),
            plane.height(),
            ExtendedColorType::L8,
        )
        .map_err(|err| BitonalError::Encode {
            format: ArtifactFormat::Png,
            reason: format!("PNG encoding failed: {err}"),
        })?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{INK, PAPER};
    use image::{GrayImage, Luma};

    #[test]
    fn png_decodes_to_the_same_plane() {
        let gray = GrayImage::from_fn(17, 9, |x, y| {
            Luma([if (x * y) % 3 == 0 { INK } else { PAPER }])
        });
        let plane = BinaryPlane::new(gray.clone()).unwrap();
        let bytes = encode_png(&plane).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&bytes).unwrap().to_luma8();
        assert_eq!(decoded, gray);
    }
}
