// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Denoising stage. Both strategies keep the plane's dimensions and only
// produce values in 0..=255.

use bitonal_core::types::Backend;
use image::GrayImage;
use imageproc::filter::median_filter;

#[cfg(feature = "accelerated")]
use super::integral::{SummedAreaTable, Window};

/// Patch radius of the non-local-means comparison (7x7 template).
#[cfg(feature = "accelerated")]
pub const TEMPLATE_RADIUS: u32 = 3;
/// Radius of the region searched for similar patches (21x21).
#[cfg(feature = "accelerated")]
pub const SEARCH_RADIUS: u32 = 10;

/// Denoise `gray` with the strategy of `backend`.
///
/// `strength` is the non-local-means filter strength `h`; the median filter
/// of the fallback backend has no strength and ignores it.
#[cfg_attr(not(feature = "accelerated"), allow(unused_variables))]
pub fn denoise(gray: &GrayImage, strength: u32, backend: Backend) -> GrayImage {
    match backend {
        #[cfg(feature = "accelerated")]
        Backend::Accelerated => non_local_means(gray, strength),
        _ => median_3x3(gray),
    }
}

/// 3x3 median filter with replicated borders.
pub fn median_3x3(gray: &GrayImage) -> GrayImage {
    median_filter(gray, 1, 1)
}

/// Non-local-means denoising with a 7x7 template and a 21x21 search region.
///
/// Every pixel becomes the weighted average of the pixels in its search
/// region, weighted by `exp(-d / h^2)` where `d` is the mean squared
/// difference between the two 7x7 patches. For each search offset the
/// squared differences go into one summed-area table, so every patch
/// distance is an O(1) lookup. Coordinates outside the plane are clamped to
/// the nearest edge. A strength of 0 returns the input unchanged.
#[cfg(feature = "accelerated")]
pub fn non_local_means(gray: &GrayImage, strength: u32) -> GrayImage {
    if strength == 0 || gray.width() == 0 || gray.height() == 0 {
        return gray.clone();
    }
    let (width, height) = gray.dimensions();
    let raw = gray.as_raw();
    let w = width as usize;
    let max_x = width as i64 - 1;
    let max_y = height as i64 - 1;
    let sample = |x: i64, y: i64| -> i64 {
        raw[y.clamp(0, max_y) as usize * w + x.clamp(0, max_x) as usize] as i64
    };

    let h2 = (strength as f64) * (strength as f64);
    let pixels = w * height as usize;
    let mut weights = vec![0f64; pixels];
    let mut values = vec![0f64; pixels];
    let mut distances = SummedAreaTable::zeroed(width, height);
    let reach = SEARCH_RADIUS as i64;

    for dy in -reach..=reach {
        for dx in -reach..=reach {
            distances.fill(|x, y| {
                let (x, y) = (x as i64, y as i64);
                let diff = sample(x, y) - sample(x + dx, y + dy);
                (diff * diff) as u64
            });
            for y in 0..height {
                for x in 0..width {
                    let patch = Window::clamped(height, width, y, x, TEMPLATE_RADIUS);
                    let distance = distances.window_sum(&patch) as f64 / patch.area() as f64;
                    let weight = (-distance / h2).exp();
                    let i = y as usize * w + x as usize;
                    weights[i] += weight;
                    values[i] += weight * sample(x as i64 + dx, y as i64 + dy) as f64;
                }
            }
        }
    }

    // The zero offset always contributes weight 1, so no weight is zero.
    let out = values
        .iter()
        .zip(&weights)
        .map(|(v, wt)| (v / wt).round().clamp(0.0, 255.0) as u8)
        .collect();
    GrayImage::from_raw(width, height, out).unwrap_or_else(|| gray.clone())
}
