// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// CCITT Group 4 (T.6) compression of a bilevel plane, via the `fax` crate.

use bitonal_core::error::{BitonalError, Result};
use bitonal_core::types::ArtifactFormat;
use fax::encoder::Encoder;
use fax::{Color, VecWriter};

use crate::image::BinaryPlane;

/// Widest line a Group 4 stream can describe.
pub const MAX_G4_WIDTH: u32 = u16::MAX as u32;

/// Encode `plane` as one Group 4 strip, terminated by EOFB.
///
/// Ink maps to black, paper to white. Planes wider than
/// [`MAX_G4_WIDTH`] are rejected as a TIFF-G4 encode failure.
pub fn encode_g4(plane: &BinaryPlane) -> Result<Vec<u8>> {
    let width = u16::try_from(plane.width()).map_err(|_| BitonalError::Encode {
        format: ArtifactFormat::TiffG4,
        reason: format!(
            "width {} exceeds the Group 4 limit of {MAX_G4_WIDTH} pixels",
            plane.width()
        ),
    })?;

    let luma = plane.as_luma();
    let mut encoder = Encoder::new(VecWriter::new());
    for row in luma.rows() {
        let pels = row.map(|px| if px.0[0] == crate::image::INK { Color::Black } else { Color::White });
        encoder.encode_line(pels, width).map_err(|_| BitonalError::Encode {
            format: ArtifactFormat::TiffG4,
            reason: "Group 4 line encoding failed".into(),
        })?;
    }
    let writer = encoder.finish().map_err(|_| BitonalError::Encode {
        format: ArtifactFormat::TiffG4,
        reason: "Group 4 stream could not be terminated".into(),
    })?;
    Ok(writer.finish())
}
