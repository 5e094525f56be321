// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Bitonal pipeline.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output formats produced by the archive stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactFormat {
    /// Lossless PNG at maximum deflate compression.
    Png,
    /// TIFF container holding a CCITT Group-4 strip.
    TiffG4,
    /// The TIFF/G4 bytes under a `.jbig` name. Not a JBIG bitstream.
    Jbig,
}

impl ArtifactFormat {
    /// All formats, in the order they are attempted.
    pub const ALL: [ArtifactFormat; 3] =
        [ArtifactFormat::Png, ArtifactFormat::TiffG4, ArtifactFormat::Jbig];

    /// Short tag shown to the user.
    pub fn tag(self) -> &'static str {
        match self {
            ArtifactFormat::Png => "PNG",
            ArtifactFormat::TiffG4 => "TIFF-G4",
            ArtifactFormat::Jbig => "JBIG",
        }
    }

    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactFormat::Png => "png",
            ArtifactFormat::TiffG4 => "tiff",
            ArtifactFormat::Jbig => "jbig",
        }
    }
}

impl std::fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Which thresholding/denoising strategy a pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Backend {
    /// Gaussian-weighted local mean and non-local-means denoising.
    Accelerated,
    /// Summed-area-table mean, median denoising and an open filter.
    Fallback,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Accelerated => f.write_str("accelerated"),
            Backend::Fallback => f.write_str("fallback"),
        }
    }
}

/// Backend requested by the host, before availability is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendPreference {
    /// Use the accelerated backend when it is compiled in.
    #[default]
    Auto,
    Accelerated,
    Fallback,
}

/// One file written by the archive stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedArtifact {
    pub format: ArtifactFormat,
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// A format that could not be written, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatFailure {
    pub format: ArtifactFormat,
    pub reason: String,
}

/// Outcome of saving one binary plane in every archive format.
///
/// Formats are attempted independently, so a report can hold both
/// artifacts and failures. An empty `artifacts` list is reported to the
/// caller rather than raised as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReport {
    pub directory: PathBuf,
    pub artifacts: Vec<SavedArtifact>,
    pub failures: Vec<FormatFailure>,
}

impl SaveReport {
    /// `true` when no format was written.
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Look up the artifact written for `format`, if any.
    pub fn artifact(&self, format: ArtifactFormat) -> Option<&SavedArtifact> {
        self.artifacts.iter().find(|a| a.format == format)
    }

    /// Short status text for the host, one line per saved format.
    pub fn summary(&self) -> String {
        if self.artifacts.is_empty() {
            return "Error: Failed to save image".to_string();
        }
        let mut text = format!("Saved {} formats:", self.artifacts.len());
        for artifact in &self.artifacts {
            let kib = artifact.size_bytes as f64 / 1024.0;
            text.push_str(&format!("\n{}: {:.1}KB", artifact.format, kib));
        }
        text
    }
}

/// Timestamped base filename, e.g. `binarized_20260314_093015`.
pub fn default_base_filename(prefix: &str) -> String {
    format!("{}_{}", prefix, Local::now().format("%Y%m%d_%H%M%S"))
}
