// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Minimal baseline TIFF container around a single Group 4 strip.
//
// Layout (little-endian):
//
//   0    header: "II", 42, offset of the IFD (8)
//   8    IFD: entry count, 13 entries sorted by tag, next-IFD offset 0
//   170  XResolution rational
//   178  YResolution rational
//   186  compressed strip

use bitonal_core::error::Result;

use super::ccitt::encode_g4;
use crate::image::BinaryPlane;

const TYPE_SHORT: u16 = 3;
const TYPE_LONG: u16 = 4;
const TYPE_RATIONAL: u16 = 5;

const COMPRESSION_CCITT_T6: u32 = 4;
const PHOTOMETRIC_WHITE_IS_ZERO: u32 = 0;
const RESOLUTION_UNIT_INCH: u32 = 2;

const ENTRY_COUNT: usize = 13;
const IFD_OFFSET: usize = 8;
const IFD_LEN: usize = 2 + ENTRY_COUNT * 12 + 4;
const X_RESOLUTION_OFFSET: usize = IFD_OFFSET + IFD_LEN;
const Y_RESOLUTION_OFFSET: usize = X_RESOLUTION_OFFSET + 8;
/// Byte offset of the strip inside every file this module writes.
pub const STRIP_OFFSET: usize = Y_RESOLUTION_OFFSET + 8;

/// Compress `plane` with Group 4 and wrap it in a TIFF container.
pub fn encode_tiff_g4(plane: &BinaryPlane, dpi: u32) -> Result<Vec<u8>> {
    let strip = encode_g4(plane)?;
    Ok(wrap_g4(&strip, plane.width(), plane.height(), dpi))
}

/// Wrap an already-compressed Group 4 strip.
pub fn wrap_g4(strip: &[u8], width: u32, height: u32, dpi: u32) -> Vec<u8> {
    let entries: [(u16, u16, u32); ENTRY_COUNT] = [
        (256, TYPE_LONG, width),                            // ImageWidth
        (257, TYPE_LONG, height),                           // ImageLength
        (258, TYPE_SHORT, 1),                               // BitsPerSample
        (259, TYPE_SHORT, COMPRESSION_CCITT_T6),            // Compression
        (262, TYPE_SHORT, PHOTOMETRIC_WHITE_IS_ZERO),       // PhotometricInterpretation
        (273, TYPE_LONG, STRIP_OFFSET as u32),              // StripOffsets
        (277, TYPE_SHORT, 1),                               // SamplesPerPixel
        (278, TYPE_LONG, height),                           // RowsPerStrip
        (279, TYPE_LONG, strip.len() as u32),               // StripByteCounts
        (282, TYPE_RATIONAL, X_RESOLUTION_OFFSET as u32),   // XResolution
        (283, TYPE_RATIONAL, Y_RESOLUTION_OFFSET as u32),   // YResolution
        (293, TYPE_LONG, 0),                                // T6Options
        (296, TYPE_SHORT, RESOLUTION_UNIT_INCH),            // ResolutionUnit
    ];

    let mut out = Vec::with_capacity(STRIP_OFFSET + strip.len());
    out.extend_from_slice(b"II");
    out.extend_from_slice(&42u16.to_le_bytes());
    out.extend_from_slice(&(IFD_OFFSET as u32).to_le_bytes());

    out.extend_from_slice(&(ENTRY_COUNT as u16).to_le_bytes());
    for (tag, kind, value) in entries {
        out.extend_from_slice(&tag.to_le_bytes());
        out.extend_from_slice(&kind.to_le_bytes());
        out.extend_from_slice(&1u32.to_le_bytes());
        // SHORT values sit left-justified in the 4-byte field; with
        // little-endian order that is the low half of the u32.
        out.extend_from_slice(&value.to_le_bytes());
    }
    out.extend_from_slice(&0u32.to_le_bytes());

    for _ in 0..2 {
        out.extend_from_slice(&dpi.to_le_bytes());
        out.extend_from_slice(&1u32.to_le_bytes());
    }

    debug_assert_eq!(out.len(), STRIP_OFFSET);
    out.extend_from_slice(strip);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{INK, PAPER};
    use image::{GrayImage, Luma};

    fn u16_at(bytes: &[u8], at: usize) -> u16 {
        u16::from_le_bytes([bytes[at], bytes[at + 1]])
    }

    fn u32_at(bytes: &[u8], at: usize) -> u32 {
        u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
    }

    /// Value of `tag` in the first IFD.
    fn tag_value(bytes: &[u8], tag: u16) -> Option<u32> {
        let ifd = u32_at(bytes, 4) as usize;
        let count = u16_at(bytes, ifd) as usize;
        (0..count).find_map(|i| {
            let entry = ifd + 2 + i * 12;
            (u16_at(bytes, entry) == tag).then(|| match u16_at(bytes, entry + 2) {
                TYPE_SHORT => u16_at(bytes, entry + 8) as u32,
                _ => u32_at(bytes, entry + 8),
            })
        })
    }

    #[test]
    fn header_and_tags_describe_the_strip() {
        let strip = [0xAA, 0xBB, 0xCC];
        let bytes = wrap_g4(&strip, 640, 480, 300);
        assert_eq!(&bytes[..4], &[b'I', b'I', 42, 0]);
        assert_eq!(tag_value(&bytes, 256), Some(640));
        assert_eq!(tag_value(&bytes, 257), Some(480));
        assert_eq!(tag_value(&bytes, 258), Some(1));
        assert_eq!(tag_value(&bytes, 259), Some(4));
        assert_eq!(tag_value(&bytes, 262), Some(0));
        assert_eq!(tag_value(&bytes, 279), Some(3));
        assert_eq!(tag_value(&bytes, 296), Some(2));

        let offset = tag_value(&bytes, 273).unwrap() as usize;
        assert_eq!(offset, STRIP_OFFSET);
        assert_eq!(&bytes[offset..], &strip);

        let x_res = tag_value(&bytes, 282).unwrap() as usize;
        assert_eq!((u32_at(&bytes, x_res), u32_at(&bytes, x_res + 4)), (300, 1));
    }

    #[test]
    fn tags_are_sorted() {
        let bytes = wrap_g4(&[], 1, 1, 72);
        let tags: Vec<u16> = (0..ENTRY_COUNT).map(|i| u16_at(&bytes, IFD_OFFSET + 2 + i * 12)).collect();
        let mut sorted = tags.clone();
        sorted.sort_unstable();
        assert_eq!(tags, sorted);
    }

    #[test]
    fn encoded_container_holds_the_g4_strip() {
        let gray = GrayImage::from_fn(48, 20, |x, y| Luma([if (x + y) % 5 == 0 { INK } else { PAPER }]));
        let plane = BinaryPlane::new(gray).unwrap();
        let bytes = encode_tiff_g4(&plane, 300).unwrap();
        let strip = &bytes[STRIP_OFFSET..];
        assert_eq!(strip, encode_g4(&plane).unwrap().as_slice());
        assert_eq!(tag_value(&bytes, 278), Some(20));
    }
}
