// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Grayscale input planes and bilevel output planes.

pub mod plane;

pub use plane::{BinaryPlane, GrayPlane, INK, PAPER};
