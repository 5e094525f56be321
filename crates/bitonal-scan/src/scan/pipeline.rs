// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The binarization pipeline: denoise, threshold, and (fallback only) open.

use bitonal_core::config::{ProcessingParams, ScanConfig};
use bitonal_core::error::Result;
use bitonal_core::types::{Backend, BackendPreference};
use image::DynamicImage;
use tracing::{debug, info, instrument};

use super::backend::{self, BackendSelection};
use super::{denoise, morphology, threshold};
use crate::image::{BinaryPlane, GrayPlane};

/// Turns grayscale page photos into bilevel planes.
///
/// The backend is resolved once in the constructor and never changes for
/// the lifetime of the pipeline. Each call to [`ScanPipeline::process`]
/// owns all of its buffers, so one pipeline can serve any number of images.
#[derive(Debug, Clone)]
pub struct ScanPipeline {
    selection: BackendSelection,
    params: ProcessingParams,
}

impl ScanPipeline {
    // -- Construction ---------------------------------------------------------

    /// Build a pipeline for `preference` with the given parameters.
    pub fn new(preference: BackendPreference, params: ProcessingParams) -> Self {
        Self {
            selection: backend::resolve(preference),
            params,
        }
    }

    /// Build a pipeline from host settings.
    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(config.backend, config.params)
    }

    /// Copy of this pipeline with different parameters; the backend is kept.
    pub fn with_params(&self, params: ProcessingParams) -> Self {
        Self {
            selection: self.selection,
            params,
        }
    }

    // -- Accessors ------------------------------------------------------------

    /// Backend every stage of this pipeline runs.
    pub fn backend(&self) -> Backend {
        self.selection.active
    }

    pub fn selection(&self) -> BackendSelection {
        self.selection
    }

    pub fn params(&self) -> &ProcessingParams {
        &self.params
    }

    // -- Processing -----------------------------------------------------------

    /// Run every stage over `plane`.
    ///
    /// 1. Denoise (skipped when the strength is 0).
    /// 2. Adaptive threshold against the backend's local reference.
    /// 3. Open filter, on the fallback backend only.
    #[instrument(skip(self, plane), fields(
        width = plane.width(),
        height = plane.height(),
        backend = %self.selection.active,
    ))]
    pub fn process(&self, plane: &GrayPlane) -> Result<BinaryPlane> {
        let backend = self.selection.active;

        let denoised = if self.params.denoise_enabled() {
            let out = denoise::denoise(plane.as_luma(), self.params.denoise_strength(), backend);
            debug!(strength = self.params.denoise_strength(), "Denoised plane");
            Some(out)
        } else {
            None
        };
        let gray = denoised.as_ref().unwrap_or(plane.as_luma());

        let binary = threshold::adaptive_threshold(gray, &self.params, backend)?;

        let binary = match backend {
            Backend::Fallback => {
                let opened = BinaryPlane::from_stage(morphology::open(binary.as_luma()));
                debug!(ink = opened.ink_count(), "Applied open filter");
                opened
            }
            Backend::Accelerated => binary,
        };

        info!(
            ink = binary.ink_count(),
            paper = binary.paper_count(),
            "Binarization complete"
        );
        Ok(binary)
    }

    /// Reduce a decoded image to grayscale and run [`ScanPipeline::process`].
    pub fn process_image(&self, image: &DynamicImage) -> Result<BinaryPlane> {
        let plane = GrayPlane::from_dynamic(image)?;
        self.process(&plane)
    }
}

impl Default for ScanPipeline {
    /// Auto backend with the one-step parameters.
    fn default() -> Self {
        Self::new(BackendPreference::Auto, ProcessingParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{INK, PAPER};
    use image::{GrayImage, Luma};

    fn page() -> GrayPlane {
        let gray = GrayImage::from_fn(40, 30, |x, y| {
            let ink = (12..20).contains(&x) && (8..22).contains(&y);
            Luma([if ink { 30 } else { 220 }])
        });
        GrayPlane::from_luma(gray).unwrap()
    }

    #[test]
    fn fallback_pipeline_keeps_solid_blocks() {
        let params = ProcessingParams::new(11, 2, 0).unwrap();
        let pipeline = ScanPipeline::new(BackendPreference::Fallback, params);
        assert_eq!(pipeline.backend(), Backend::Fallback);
        let out = pipeline.process(&page()).unwrap();
        assert_eq!(out.ink_count(), 8 * 14);
        assert!(out.is_ink(12, 8) && out.is_ink(19, 21));
        assert!(!out.is_ink(11, 8));
    }

    #[test]
    fn fallback_median_clears_isolated_specks() {
        let mut gray = GrayImage::from_pixel(30, 30, Luma([PAPER]));
        gray.put_pixel(7, 7, Luma([INK]));
        gray.put_pixel(20, 4, Luma([INK]));
        let plane = GrayPlane::from_luma(gray).unwrap();
        let pipeline = ScanPipeline::new(BackendPreference::Fallback, ProcessingParams::default());
        let out = pipeline.process(&plane).unwrap();
        assert_eq!(out.ink_count(), 0);
    }

    #[test]
    fn with_params_keeps_backend() {
        let pipeline = ScanPipeline::new(BackendPreference::Fallback, ProcessingParams::default());
        let tuned = pipeline.with_params(ProcessingParams::default().with_bias(9));
        assert_eq!(tuned.backend(), Backend::Fallback);
        assert_eq!(tuned.params().bias(), 9);
    }

    #[test]
    fn from_config_uses_configured_backend() {
        let config = ScanConfig {
            backend: BackendPreference::Fallback,
            ..ScanConfig::default()
        };
        let pipeline = ScanPipeline::from_config(&config);
        assert_eq!(pipeline.selection().requested, BackendPreference::Fallback);
        assert_eq!(pipeline.params(), &ProcessingParams::default());
    }

    #[cfg(feature = "accelerated")]
    #[test]
    fn accelerated_pipeline_keeps_solid_blocks() {
        let pipeline = ScanPipeline::default();
        assert_eq!(pipeline.backend(), Backend::Accelerated);
        let out = pipeline.process(&page()).unwrap();
        assert_eq!(out.ink_count(), 8 * 14);
    }
}
