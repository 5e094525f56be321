// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Archive writer: one binary plane in, up to three files out.
//
// Each format is attempted independently. Only a missing output directory
// that cannot be created fails the whole call; everything after that lands
// in the report as an artifact or a per-format failure.

use std::fs;
use std::path::Path;

use bitonal_core::error::{BitonalError, Result};
use bitonal_core::types::{ArtifactFormat, FormatFailure, SaveReport, SavedArtifact};
use tracing::{debug, info, instrument, warn};

use super::png::encode_png;
use super::tiff::encode_tiff_g4;
use crate::image::BinaryPlane;

/// Resolution recorded in the TIFF container by [`save`].
pub const DEFAULT_DPI: u32 = 300;

/// Save `plane` as `{base}.png`, `{base}.tiff` and `{base}.jbig` inside
/// `directory`, creating it if needed.
pub fn save(
    plane: &BinaryPlane,
    directory: impl AsRef<Path>,
    base_filename: &str,
) -> Result<SaveReport> {
    save_with_dpi(plane, directory, base_filename, DEFAULT_DPI)
}

/// [`save`] with an explicit TIFF resolution.
///
/// The `.jbig` file carries the same bytes as the `.tiff` file; it is a
/// naming convenience for downstream tooling, not a JBIG bitstream.
#[instrument(skip(plane, directory), fields(
    width = plane.width(),
    height = plane.height(),
    directory = %directory.as_ref().display(),
))]
pub fn save_with_dpi(
    plane: &BinaryPlane,
    directory: impl AsRef<Path>,
    base_filename: &str,
    dpi: u32,
) -> Result<SaveReport> {
    validate_base_filename(base_filename)?;
    if dpi == 0 {
        return Err(BitonalError::invalid("dpi must be positive"));
    }
    let directory = directory.as_ref();
    fs::create_dir_all(directory)?;

    let mut report = SaveReport {
        directory: directory.to_path_buf(),
        ..SaveReport::default()
    };

    let png = encode_png(plane)
        .and_then(|bytes| write_artifact(directory, base_filename, ArtifactFormat::Png, &bytes));
    record(&mut report, ArtifactFormat::Png, png);

    // One Group 4 encode feeds both the TIFF and the JBIG-named copy.
    match encode_tiff_g4(plane, dpi) {
        Ok(bytes) => {
            for format in [ArtifactFormat::TiffG4, ArtifactFormat::Jbig] {
                let written = write_artifact(directory, base_filename, format, &bytes);
                record(&mut report, format, written);
            }
        }
        Err(err) => {
            warn!(error = %err, "Group 4 encoding failed, skipping TIFF-G4 and JBIG");
            for format in [ArtifactFormat::TiffG4, ArtifactFormat::Jbig] {
                report.failures.push(FormatFailure {
                    format,
                    reason: err.to_string(),
                });
            }
        }
    }

    if report.is_empty() {
        warn!(failures = report.failures.len(), "No format could be saved");
    } else {
        info!(
            saved = report.artifacts.len(),
            failed = report.failures.len(),
            "Binary plane archived"
        );
    }
    Ok(report)
}

/// Write `bytes` to `{directory}/{base}.{ext}`.
///
/// I/O errors are reported as an encode failure of `format`, so the caller
/// can keep going with the next one.
pub fn write_artifact(
    directory: &Path,
    base_filename: &str,
    format: ArtifactFormat,
    bytes: &[u8],
) -> Result<SavedArtifact> {
    let path = directory.join(format!("{base_filename}.{}", format.extension()));
    let io_failure = |err: std::io::Error| BitonalError::Encode {
        format,
        reason: format!("failed to write {}: {err}", path.display()),
    };
    fs::write(&path, bytes).map_err(io_failure)?;
    let size_bytes = fs::metadata(&path).map_err(io_failure)?.len();
    debug!(format = %format, path = %path.display(), size_bytes, "Artifact written");
    Ok(SavedArtifact {
        format,
        path,
        size_bytes,
    })
}

fn record(report: &mut SaveReport, format: ArtifactFormat, outcome: Result<SavedArtifact>) {
    match outcome {
        Ok(artifact) => report.artifacts.push(artifact),
        Err(err) => {
            warn!(format = %format, error = %err, "Format could not be saved");
            report.failures.push(FormatFailure {
                format,
                reason: err.to_string(),
            });
        }
    }
}

fn validate_base_filename(base: &str) -> Result<()> {
    if base.is_empty() || base == "." || base == ".." {
        return Err(BitonalError::invalid(format!(
            "base filename {base:?} is not a usable file name"
        )));
    }
    if base.contains(['/', '\\']) {
        return Err(BitonalError::invalid(format!(
            "base filename {base:?} must not contain path separators"
        )));
    }
    Ok(())
}
