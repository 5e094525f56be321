// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Bitonal.

use thiserror::Error;

use crate::types::ArtifactFormat;

/// Top-level error type for all Bitonal operations.
#[derive(Debug, Error)]
pub enum BitonalError {
    // -- Input validation --
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("plane is not bilevel: value {value} at ({x}, {y})")]
    NotBilevel { x: u32, y: u32, value: u8 },

    // -- Encoding --
    #[error("{format} encoding failed: {reason}")]
    Encode {
        format: ArtifactFormat,
        reason: String,
    },

    // -- Host I/O --
    #[error("image decoding failed: {0}")]
    ImageDecode(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse classification of an error, as reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected before any processing began.
    InvalidInput,
    /// A single output format could not be produced.
    EncodeFailure,
    /// Filesystem or decode failure; no partial results are claimed.
    IoFailure,
}

impl BitonalError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BitonalError::InvalidInput(_)
            | BitonalError::NotBilevel { .. }
            | BitonalError::Config(_) => ErrorKind::InvalidInput,
            BitonalError::Encode { .. } => ErrorKind::EncodeFailure,
            BitonalError::ImageDecode(_)
            | BitonalError::Io(_)
            | BitonalError::Serialization(_) => ErrorKind::IoFailure,
        }
    }

    /// Shorthand for an [`BitonalError::InvalidInput`] with a formatted reason.
    pub fn invalid(reason: impl Into<String>) -> Self {
        BitonalError::InvalidInput(reason.into())
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BitonalError>;
