// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Binarization stages: summed-area table, local statistics, denoising,
// adaptive thresholding and morphological cleanup, driven by `ScanPipeline`.

pub mod backend;
pub mod denoise;
pub mod integral;
pub mod local_stats;
pub mod morphology;
pub mod pipeline;
pub mod threshold;

pub use backend::{BackendSelection, resolve};
pub use integral::SummedAreaTable;
pub use local_stats::local_mean;
pub use pipeline::ScanPipeline;
