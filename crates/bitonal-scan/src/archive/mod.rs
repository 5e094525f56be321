// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bilevel archive formats: PNG, TIFF with a CCITT Group 4 strip, and the
// `.jbig`-named copy of the TIFF.

pub mod ccitt;
pub mod png;
pub mod tiff;
pub mod writer;

pub use ccitt::encode_g4;
pub use png::encode_png;
pub use tiff::encode_tiff_g4;
pub use writer::{DEFAULT_DPI, save, save_with_dpi};
