//! # Core Type Definitions
//!
//! This module contains the shared types of the meshport pipeline:
//! - Upload kinds (`UploadType`)
//! - User-facing error guidance (`ErrorHints`)
//! - Error types (`ImportError`)
//!
//! ## Error Presentation
//!
//! Every `ImportError` is presented exactly once, by the binary, with a bold
//! `ERROR` label followed by the optional `PROBABLE CAUSE` and
//! `SUGGESTED REMEDIATION` blocks carried in [`ErrorHints`].

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// UPLOAD TYPE
// =============================================================================

/// The `uploadType` discriminator understood by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UploadType {
    /// A single model file or a tar.gz bundle of a model directory.
    #[serde(rename = "file")]
    File,
    /// A remote location the registry fetches by itself.
    #[serde(rename = "urlImport")]
    UrlImport,
    /// A model/component/relationship CSV triplet.
    #[serde(rename = "csv")]
    Csv,
}

impl UploadType {
    /// Wire name of the upload type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::UrlImport => "urlImport",
            Self::Csv => "csv",
        }
    }
}

impl std::fmt::Display for UploadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ERROR HINTS
// =============================================================================

/// Guidance attached to an error for the person running the import.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorHints {
    /// Likely reasons for the failure.
    pub probable_cause: Vec<String>,
    /// Steps the user can take to fix it.
    pub suggested_remediation: Vec<String>,
}

impl ErrorHints {
    /// Create hints from cause and remediation lists.
    #[must_use]
    pub fn new<C, R>(probable_cause: C, suggested_remediation: R) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            probable_cause: probable_cause.into_iter().map(Into::into).collect(),
            suggested_remediation: suggested_remediation.into_iter().map(Into::into).collect(),
        }
    }

    /// True when there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.probable_cause.is_empty() && self.suggested_remediation.is_empty()
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that terminate an import.
///
/// Malformed entries inside an otherwise valid registry reply are NOT
/// represented here; they are logged and skipped by the classifier.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Bad or missing command line arguments.
    #[error("{0}")]
    Usage(String),

    /// A file could not be read.
    #[error("Unable to read file {path:?}: {reason}")]
    FileRead {
        /// Offending path.
        path: PathBuf,
        /// Underlying cause.
        reason: String,
    },

    /// A path could not be stat'ed (missing or unreadable).
    #[error("Unable to stat {path:?}: {reason}")]
    FolderStat {
        /// Offending path.
        path: PathBuf,
        /// Underlying cause.
        reason: String,
    },

    /// The model/component/relationship CSV triplet could not be resolved.
    #[error("Error importing model using CSV files: {message}")]
    CsvLocation {
        /// What went wrong.
        message: String,
        /// Cause and remediation shown to the user.
        hints: ErrorHints,
    },

    /// The registry could not be reached or did not answer 200 OK.
    #[error("Request to {url} failed: {reason}")]
    Request {
        /// Endpoint that was called.
        url: String,
        /// Transport error or HTTP status.
        reason: String,
    },

    /// A payload or the registry reply could not be decoded.
    #[error("Unable to decode {what}: {reason}")]
    Decode {
        /// The thing being decoded.
        what: String,
        /// Parser message.
        reason: String,
    },

    /// The reply was well formed but no model was registered.
    #[error("Invalid model: no model was registered from the given input")]
    NoModelRegistered,

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ImportError {
    /// Build a decode error.
    pub fn decode(what: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Decode {
            what: what.into(),
            reason: reason.to_string(),
        }
    }

    /// Hints attached to this error, if any.
    #[must_use]
    pub fn hints(&self) -> Option<&ErrorHints> {
        match self {
            Self::CsvLocation { hints, .. } if !hints.is_empty() => Some(hints),
            _ => None,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_type_wire_names() {
        assert_eq!(UploadType::File.as_str(), "file");
        assert_eq!(UploadType::UrlImport.as_str(), "urlImport");
        assert_eq!(UploadType::Csv.as_str(), "csv");

        let json = serde_json::to_string(&UploadType::UrlImport).expect("serialize");
        assert_eq!(json, "\"urlImport\"");
    }

    #[test]
    fn hints_only_reported_when_present() {
        let empty = ImportError::CsvLocation {
            message: "none".to_string(),
            hints: ErrorHints::default(),
        };
        assert!(empty.hints().is_none());

        let hinted = ImportError::CsvLocation {
            message: "none".to_string(),
            hints: ErrorHints::new(["no model csv"], Vec::<String>::new()),
        };
        let hints = hinted.hints().expect("hints");
        assert_eq!(hints.probable_cause, vec!["no model csv".to_string()]);
        assert!(hints.suggested_remediation.is_empty());
    }

    #[test]
    fn no_model_registered_message() {
        let msg = ImportError::NoModelRegistered.to_string();
        assert!(msg.contains("no model was registered"));
    }
}
