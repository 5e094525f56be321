// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Processing parameters and host configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{BitonalError, Result};
use crate::types::BackendPreference;

/// Immutable parameters for one processing run.
///
/// `window_size` is always odd. Even values passed to [`ProcessingParams::new`]
/// are incremented by one; this is the only place the coercion happens, so
/// every caller sees the same window. Re-configuring builds a new record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ParamsRecord")]
pub struct ProcessingParams {
    window_size: u32,
    bias: i32,
    denoise_strength: u32,
}

/// Unvalidated shape of [`ProcessingParams`] as it appears in config files.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct ParamsRecord {
    window_size: i32,
    bias: i32,
    denoise_strength: u32,
}

impl Default for ParamsRecord {
    fn default() -> Self {
        Self {
            window_size: ProcessingParams::DEFAULT_WINDOW_SIZE as i32,
            bias: ProcessingParams::DEFAULT_BIAS,
            denoise_strength: ProcessingParams::DEFAULT_DENOISE_STRENGTH,
        }
    }
}

impl TryFrom<ParamsRecord> for ProcessingParams {
    type Error = BitonalError;

    fn try_from(record: ParamsRecord) -> Result<Self> {
        ProcessingParams::new(record.window_size, record.bias, record.denoise_strength)
    }
}

impl ProcessingParams {
    pub const DEFAULT_WINDOW_SIZE: u32 = 11;
    pub const DEFAULT_BIAS: i32 = 2;
    pub const DEFAULT_DENOISE_STRENGTH: u32 = 5;

    /// Validate and build a parameter record.
    ///
    /// Even `window_size` values become `window_size + 1`. A window that is
    /// still not positive after coercion is rejected.
    pub fn new(window_size: i32, bias: i32, denoise_strength: u32) -> Result<Self> {
        let coerced = if window_size % 2 == 0 {
            window_size.saturating_add(1)
        } else {
            window_size
        };
        if coerced <= 0 {
            return Err(BitonalError::invalid(format!(
                "window size must be positive, got {window_size}"
            )));
        }
        Ok(Self {
            window_size: coerced as u32,
            bias,
            denoise_strength,
        })
    }

    /// Odd side length of the local window.
    pub fn window_size(&self) -> u32 {
        self.window_size
    }

    /// Half the window, rounded down.
    pub fn radius(&self) -> u32 {
        self.window_size / 2
    }

    /// Threshold offset `C`; larger values favour background.
    pub fn bias(&self) -> i32 {
        self.bias
    }

    /// Denoiser filter strength; `0` disables denoising.
    pub fn denoise_strength(&self) -> u32 {
        self.denoise_strength
    }

    pub fn denoise_enabled(&self) -> bool {
        self.denoise_strength > 0
    }

    /// Copy with a different window size (coerced like [`ProcessingParams::new`]).
    pub fn with_window_size(self, window_size: i32) -> Result<Self> {
        Self::new(window_size, self.bias, self.denoise_strength)
    }

    pub fn with_bias(self, bias: i32) -> Self {
        Self { bias, ..self }
    }

    pub fn with_denoise_strength(self, denoise_strength: u32) -> Self {
        Self {
            denoise_strength,
            ..self
        }
    }
}

impl Default for ProcessingParams {
    /// The validated one-step configuration: window 11, bias 2, strength 5.
    fn default() -> Self {
        Self {
            window_size: Self::DEFAULT_WINDOW_SIZE,
            bias: Self::DEFAULT_BIAS,
            denoise_strength: Self::DEFAULT_DENOISE_STRENGTH,
        }
    }
}

/// Persistent host settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Parameters for every processing run.
    pub params: ProcessingParams,
    /// Which backend to ask for.
    pub backend: BackendPreference,
    /// Directory that receives the saved artifacts.
    pub output_dir: PathBuf,
    /// Prefix for timestamped base filenames.
    pub file_prefix: String,
    /// Resolution written into the TIFF container.
    pub dpi: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            params: ProcessingParams::default(),
            backend: BackendPreference::Auto,
            output_dir: PathBuf::from("output").join("binarized"),
            file_prefix: "binarized".to_string(),
            dpi: 300,
        }
    }
}

impl ScanConfig {
    /// Load settings from a JSON file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: ScanConfig = serde_json::from_str(&text)?;
        if config.dpi == 0 {
            return Err(BitonalError::Config("dpi must be positive".to_string()));
        }
        Ok(config)
    }

    /// Write settings as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), text)?;
        Ok(())
    }
}
