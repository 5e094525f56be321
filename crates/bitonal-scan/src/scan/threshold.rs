// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Adaptive thresholding.
//
// Every pixel is compared against a reference computed from its own
// neighbourhood instead of one global cut-off, so a page lit unevenly from
// one side keeps its shadowed half as paper:
//
//   output = PAPER  if I > reference - bias
//          = INK    otherwise
//
// The accelerated backend uses a Gaussian-weighted local mean, the fallback
// backend the arithmetic mean from the summed-area table.

use bitonal_core::config::ProcessingParams;
use bitonal_core::error::{BitonalError, Result};
use bitonal_core::types::Backend;
use image::GrayImage;
use tracing::debug;

use super::integral::SummedAreaTable;
use super::local_stats::local_mean_plane;
use crate::image::{BinaryPlane, INK, PAPER};

/// Threshold `gray` with the reference of `backend`.
pub fn adaptive_threshold(
    gray: &GrayImage,
    params: &ProcessingParams,
    backend: Backend,
) -> Result<BinaryPlane> {
    let binary = match backend {
        #[cfg(feature = "accelerated")]
        Backend::Accelerated => gaussian_threshold(gray, params)?,
        _ => mean_threshold(gray, params)?,
    };
    debug!(
        backend = %backend,
        window_size = params.window_size(),
        bias = params.bias(),
        ink = binary.ink_count(),
        "Thresholded plane"
    );
    Ok(binary)
}

/// Threshold against the arithmetic mean of each clamped window.
pub fn mean_threshold(gray: &GrayImage, params: &ProcessingParams) -> Result<BinaryPlane> {
    let table = SummedAreaTable::build(gray)?;
    let reference = local_mean_plane(&table, params.radius());
    threshold_against(gray, &reference, params.bias())
}

/// Threshold against a Gaussian-weighted local mean.
///
/// The kernel spans the full `window_size` and borders replicate the edge
/// pixels. The reference is rounded to whole intensities, as an 8-bit blur
/// would produce.
#[cfg(feature = "accelerated")]
pub fn gaussian_threshold(gray: &GrayImage, params: &ProcessingParams) -> Result<BinaryPlane> {
    use image::{ImageBuffer, Luma};
    use imageproc::filter::separable_filter_equal;

    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return Err(BitonalError::invalid("cannot threshold an empty plane"));
    }
    let samples: Vec<f32> = gray.as_raw().iter().map(|&v| v as f32).collect();
    let plane: ImageBuffer<Luma<f32>, Vec<f32>> = ImageBuffer::from_raw(width, height, samples)
        .ok_or_else(|| BitonalError::invalid("plane buffer does not match its dimensions"))?;

    let kernel = gaussian_kernel(params.window_size());
    let blurred = separable_filter_equal(&plane, &kernel);
    let reference: Vec<f32> = blurred.into_raw().into_iter().map(f32::round).collect();
    threshold_against(gray, &reference, params.bias())
}

/// Normalised 1-D Gaussian kernel of odd length `size`.
///
/// Sigma is derived from the size the way common vision libraries do it:
/// `0.3 * ((size - 1) * 0.5 - 1) + 0.8`.
#[cfg(feature = "accelerated")]
pub fn gaussian_kernel(size: u32) -> Vec<f32> {
    let size = size.max(1) | 1;
    let sigma = 0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8;
    let centre = (size / 2) as f64;
    let raw: Vec<f64> = (0..size)
        .map(|i| {
            let d = i as f64 - centre;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let total: f64 = raw.iter().sum();
    raw.into_iter().map(|v| (v / total) as f32).collect()
}

/// Apply the decision rule against a per-pixel reference plane.
///
/// The comparison is strict: a pixel exactly at `reference - bias` is ink.
pub fn threshold_against(gray: &GrayImage, reference: &[f32], bias: i32) -> Result<BinaryPlane> {
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return Err(BitonalError::invalid("cannot threshold an empty plane"));
    }
    if reference.len() != gray.as_raw().len() {
        return Err(BitonalError::invalid(format!(
            "reference plane holds {} values for a {width}x{height} image",
            reference.len()
        )));
    }

    let bias = bias as f32;
    let out: Vec<u8> = gray
        .as_raw()
        .iter()
        .zip(reference)
        .map(|(&px, &r)| if px as f32 > r - bias { PAPER } else { INK })
        .collect();
    let image = GrayImage::from_raw(width, height, out)
        .ok_or_else(|| BitonalError::invalid("thresholded buffer does not match dimensions"))?;
    Ok(BinaryPlane::from_stage(image))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use proptest::prelude::*;

    fn params(window: i32, bias: i32) -> ProcessingParams {
        ProcessingParams::new(window, bias, 0).unwrap()
    }

    fn backends() -> Vec<Backend> {
        let mut all = vec![Backend::Fallback];
        if cfg!(feature = "accelerated") {
            all.push(Backend::Accelerated);
        }
        all
    }

    fn arb_plane() -> impl Strategy<Value = GrayImage> {
        (1u32..16, 1u32..16).prop_flat_map(|(w, h)| {
            prop::collection::vec(any::<u8>(), (w * h) as usize)
                .prop_map(move |data| GrayImage::from_raw(w, h, data).unwrap())
        })
    }

    #[test]
    fn tie_is_classified_as_ink() {
        let gray = GrayImage::from_pixel(1, 1, Luma([100]));
        let ink = threshold_against(&gray, &[102.0], 2).unwrap();
        assert!(ink.is_ink(0, 0));
        let paper = threshold_against(&gray, &[101.5], 2).unwrap();
        assert!(!paper.is_ink(0, 0));
    }

    #[test]
    fn mismatched_reference_is_rejected() {
        let gray = GrayImage::from_pixel(2, 2, Luma([0]));
        assert!(threshold_against(&gray, &[0.0; 3], 0).is_err());
    }

    #[test]
    fn single_pixel_with_huge_window() {
        let gray = GrayImage::from_pixel(1, 1, Luma([90]));
        for backend in backends() {
            let out = adaptive_threshold(&gray, &params(101, 2), backend).unwrap();
            // Reference is the pixel itself: 90 > 90 - 2.
            assert!(!out.is_ink(0, 0), "{backend}");
        }
    }

    #[test]
    fn dark_stroke_on_light_page_is_ink() {
        let mut gray = GrayImage::from_pixel(21, 21, Luma([210]));
        for y in 0..21 {
            gray.put_pixel(10, y, Luma([40]));
        }
        for backend in backends() {
            let out = adaptive_threshold(&gray, &params(11, 2), backend).unwrap();
            assert_eq!(out.ink_count(), 21, "{backend}");
            assert!(out.is_ink(10, 0) && out.is_ink(10, 20), "{backend}");
        }
    }

    #[cfg(feature = "accelerated")]
    #[test]
    fn gaussian_kernel_is_normalised_and_symmetric() {
        let kernel = gaussian_kernel(11);
        assert_eq!(kernel.len(), 11);
        let total: f32 = kernel.iter().sum();
        assert!((total - 1.0).abs() < 1e-5);
        for i in 0..5 {
            assert_eq!(kernel[i], kernel[10 - i]);
        }
        assert!(kernel[5] > kernel[4]);
        assert_eq!(gaussian_kernel(1), vec![1.0]);
    }

    proptest! {
        #[test]
        fn uniform_plane_is_classified_uniformly(
            k in any::<u8>(),
            w in 1u32..40,
            h in 1u32..40,
            window in 1i32..30,
        ) {
            let gray = GrayImage::from_pixel(w, h, Luma([k]));
            for backend in backends() {
                let out = adaptive_threshold(&gray, &params(window, 0), backend).unwrap();
                let first = out.is_ink(0, 0);
                prop_assert!(out.as_luma().pixels().all(|p| (p.0[0] == INK) == first));
            }
        }

        #[test]
        fn larger_bias_never_adds_ink(
            gray in arb_plane(),
            window in 1i32..12,
            bias in -40i32..40,
            step in 1i32..30,
        ) {
            for backend in backends() {
                let low = adaptive_threshold(&gray, &params(window, bias), backend).unwrap();
                let high = adaptive_threshold(&gray, &params(window, bias + step), backend).unwrap();
                prop_assert!(high.paper_count() >= low.paper_count());
                for (a, b) in low.as_luma().pixels().zip(high.as_luma().pixels()) {
                    prop_assert!(!(a.0[0] == PAPER && b.0[0] == INK));
                }
            }
        }
    }
}
