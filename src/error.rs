//! Error type shared by every stage of the sampler, from setup through rebuild.
//!
//! All of these are fatal. Setup never substitutes default data for a
//! malformed input, and a sampler that was built successfully cannot
//! produce any of them from `sample_*` calls.
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FieldError>;

/// Failure raised while configuring, loading, or advancing a field sampler.
#[derive(Error, Debug)]
pub enum FieldError {
    /// Parameters are missing or inconsistent for the selected mode.
    #[error("Setup configuration error: {0}")]
    SetupConfig(String),

    /// A coordinate or data table has the wrong number of columns
    /// for the declared dimensionality.
    #[error("Format mismatch in {file}: expected {expected} columns, found {found}")]
    FormatMismatch {
        file: String,
        expected: usize,
        found: usize,
    },

    /// A data slice does not cover the spatial grid exactly.
    #[error(
        "Shape mismatch for component {component}, slice {slice}: expected {expected} values, found {found}"
    )]
    ShapeMismatch {
        component: usize,
        slice: usize,
        expected: usize,
        found: usize,
    },

    /// Contract violation: empty or non-monotonic axis, invalid clock value,
    /// or mismatched buffer lengths.
    #[error("Domain error: {0}")]
    DomainError(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path} at line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// The configuration document could not be deserialized.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl FieldError {
    pub(crate) fn setup(msg: impl Into<String>) -> Self {
        Self::SetupConfig(msg.into())
    }

    pub(crate) fn domain(msg: impl Into<String>) -> Self {
        Self::DomainError(msg.into())
    }
}
