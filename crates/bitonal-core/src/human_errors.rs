// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the host's status line.
//
// When nothing could be saved the host shows a single clear cause. Every
// technical error maps to one plain sentence plus a suggestion.

use crate::error::BitonalError;
use crate::types::FormatFailure;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Retrying the same action may work (full disk freed, file unlocked).
    Transient,
    /// The user must change something (pick another file, fix a setting).
    ActionRequired,
    /// The input itself cannot be processed.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Severity level.
    pub severity: Severity,
}

impl std::fmt::Display for HumanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.message, self.suggestion)
    }
}

/// Convert a `BitonalError` into a `HumanError`.
pub fn humanize_error(err: &BitonalError) -> HumanError {
    match err {
        BitonalError::InvalidInput(detail) => HumanError {
            message: "This image can't be processed.".into(),
            suggestion: format!("Check the image and the settings, then try again. ({detail})"),
            severity: Severity::ActionRequired,
        },

        BitonalError::NotBilevel { .. } => HumanError {
            message: "The processed page isn't pure black and white.".into(),
            suggestion: "Run the page through processing again before saving.".into(),
            severity: Severity::Permanent,
        },

        BitonalError::Encode { format, .. } => HumanError {
            message: format!("The {format} file couldn't be written."),
            suggestion: "The other formats may still have been saved. Try saving again.".into(),
            severity: Severity::Transient,
        },

        BitonalError::ImageDecode(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            severity: Severity::Permanent,
        },

        BitonalError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError {
                message: "The file couldn't be found.".into(),
                suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                severity: Severity::ActionRequired,
            },
            std::io::ErrorKind::PermissionDenied => HumanError {
                message: "There's no permission to write to the output folder.".into(),
                suggestion: "Choose a different output folder, or check its permissions.".into(),
                severity: Severity::ActionRequired,
            },
            _ => HumanError {
                message: "There was a problem reading or writing a file.".into(),
                suggestion: "Try again. If this keeps happening, your device's storage may be full.".into(),
                severity: Severity::Transient,
            },
        },

        BitonalError::Config(detail) => HumanError {
            message: "The settings file has an invalid value.".into(),
            suggestion: format!("Fix the settings file and try again. ({detail})"),
            severity: Severity::ActionRequired,
        },

        BitonalError::Serialization(_) => HumanError {
            message: "The settings file couldn't be read.".into(),
            suggestion: "Make sure it is valid JSON, or delete it to use the defaults.".into(),
            severity: Severity::ActionRequired,
        },
    }
}

/// The single cause shown when a save wrote no format at all.
///
/// Returns `None` when there are no failures to explain.
pub fn humanize_failures(failures: &[FormatFailure]) -> Option<HumanError> {
    let first = failures.first()?;
    Some(HumanError {
        message: "The page couldn't be saved in any format.".into(),
        suggestion: format!(
            "Check that the output folder is writable and has free space, then try again. ({}: {})",
            first.format, first.reason
        ),
        severity: Severity::Transient,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ArtifactFormat;

    #[test]
    fn missing_file_is_action_required() {
        let err = BitonalError::Io(std::io::Error::from(std::io::ErrorKind::NotFound));
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
    }

    #[test]
    fn encode_failure_names_the_format() {
        let err = BitonalError::Encode {
            format: ArtifactFormat::TiffG4,
            reason: "width exceeds 65535".into(),
        };
        let human = humanize_error(&err);
        assert!(human.message.contains("TIFF-G4"));
        assert_eq!(human.severity, Severity::Transient);
    }

    #[test]
    fn bad_image_is_permanent() {
        let human = humanize_error(&BitonalError::ImageDecode("truncated".into()));
        assert_eq!(human.severity, Severity::Permanent);
    }

    #[test]
    fn total_save_failure_names_the_first_cause() {
        let failures = vec![
            FormatFailure {
                format: ArtifactFormat::Png,
                reason: "disk full".into(),
            },
            FormatFailure {
                format: ArtifactFormat::TiffG4,
                reason: "disk full".into(),
            },
        ];
        let human = humanize_failures(&failures).unwrap();
        assert!(human.message.contains("any format"));
        assert!(human.suggestion.contains("PNG: disk full"));
        assert_eq!(human.severity, Severity::Transient);
        assert!(humanize_failures(&[]).is_none());
    }

    #[test]
    fn invalid_input_keeps_detail() {
        let human = humanize_error(&BitonalError::invalid("image has zero width"));
        assert!(human.suggestion.contains("zero width"));
    }
}
