// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// 3x3 morphological cleanup for the fallback backend.
//
// Thin wrappers over imageproc's grayscale morphology with a square mask of
// radius 1. Border windows only cover in-bounds pixels.

use image::GrayImage;
use imageproc::morphology::{Mask, grayscale_dilate, grayscale_erode, grayscale_open};

fn square_3x3() -> Mask {
    Mask::square(1)
}

/// 3x3 minimum filter.
pub fn erode(gray: &GrayImage) -> GrayImage {
    grayscale_erode(gray, &square_3x3())
}

/// 3x3 maximum filter.
pub fn dilate(gray: &GrayImage) -> GrayImage {
    grayscale_dilate(gray, &square_3x3())
}

/// Erode then dilate.
///
/// On a bilevel plane with paper = 255 and ink = 0, erosion grows ink by one
/// pixel and dilation shrinks it back. Paper features narrower than the
/// kernel (pinholes and 1-2 pixel gaps inside ink) are filled; ink shapes
/// come back at their original width wherever the 3x3 square fits in the
/// paper around them.
pub fn open(gray: &GrayImage) -> GrayImage {
    grayscale_open(gray, &square_3x3())
}
