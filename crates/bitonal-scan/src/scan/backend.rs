// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Backend resolution. Runs once when a pipeline is built; the result is a
// plain value carried by the pipeline.

use bitonal_core::types::{Backend, BackendPreference};
use tracing::{info, warn};

/// Outcome of resolving a [`BackendPreference`] against what is compiled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendSelection {
    pub requested: BackendPreference,
    pub active: Backend,
}

impl BackendSelection {
    /// `true` when the accelerated backend was wanted but is unavailable.
    pub fn degraded(&self) -> bool {
        self.active == Backend::Fallback && self.requested != BackendPreference::Fallback
    }
}

/// Whether this build carries the accelerated backend.
pub const fn accelerated_available() -> bool {
    cfg!(feature = "accelerated")
}

/// Pick the backend for `preference`.
///
/// A degraded selection is logged as a warning naming both backends.
pub fn resolve(preference: BackendPreference) -> BackendSelection {
    let active = match preference {
        BackendPreference::Fallback => Backend::Fallback,
        BackendPreference::Auto | BackendPreference::Accelerated => {
            if accelerated_available() {
                Backend::Accelerated
            } else {
                Backend::Fallback
            }
        }
    };
    let selection = BackendSelection {
        requested: preference,
        active,
    };

    if selection.degraded() {
        warn!(
            requested = ?preference,
            active = %active,
            "Accelerated backend not available in this build, using fallback"
        );
    } else {
        info!(requested = ?preference, active = %active, "Backend selected");
    }
    selection
}
