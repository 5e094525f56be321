// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bitonal-scan: adaptive binarization of photographed pages and bilevel
// archive encoding.
//
// A host hands over a decoded image and a `ProcessingParams` record, gets a
// `BinaryPlane` back, and saves it as PNG, TIFF (CCITT Group 4) and a
// `.jbig`-named copy of the TIFF.

pub mod archive;
pub mod image;
pub mod scan;

pub use archive::{save, save_with_dpi};
pub use image::{BinaryPlane, GrayPlane, INK, PAPER};
pub use scan::{BackendSelection, ScanPipeline};

use bitonal_core::config::ProcessingParams;
use bitonal_core::error::Result;
use bitonal_core::types::BackendPreference;

/// Binarize `image` with the best backend this build offers.
///
/// For repeated calls build a [`ScanPipeline`] once instead; this resolves
/// the backend on every call.
pub fn process(image: &::image::DynamicImage, params: ProcessingParams) -> Result<BinaryPlane> {
    ScanPipeline::new(BackendPreference::Auto, params).process_image(image)
}
