//! Error taxonomy for artifact loading, label alignment, and input validation.
//!
//! Artifact and alignment errors are fatal at session start: the monitor
//! refuses to serve predictions from a bundle it cannot verify, rather than
//! silently displaying a wrong label. Validation errors are recovered inline
//! and never touch process-wide state.

use thiserror::Error;

/// Artifact bundle failures: missing, corrupt, or structurally invalid.
/// Fatal; session start must abort.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read artifact bundle at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact bundle is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("artifact bundle failed validation: {0}")]
    Invalid(String),
}

/// The classifier's declared class ordering cannot be bijectively matched to
/// the canonical state set. Fatal at load time; never worked around with a
/// guessed or partial mapping.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LabelMismatchError {
    #[error("classifier declares {found} classes, expected {expected}")]
    CardinalityMismatch { expected: usize, found: usize },

    #[error("classifier class '{0}' matches no canonical moisture state")]
    UnknownLabel(String),

    #[error("classifier class '{0}' is declared more than once")]
    DuplicateLabel(String),

    #[error("classifier output position {0} has no declared class")]
    UndeclaredPosition(usize),
}

/// Input validation failures. Recovered inline; a rejected reading never
/// reaches the scaler or the classifier.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("moisture reading {0}% is outside the accepted range 0-100%")]
    OutOfRange(f64),

    #[error("moisture reading is not a finite number")]
    NotFinite,
}

/// Umbrella error for the inference pipeline.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    LabelMismatch(#[from] LabelMismatchError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
