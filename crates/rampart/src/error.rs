//! Error types for Rampart operations.
//!
//! Construction and compilation report [`BuildError`]; rendering reports
//! [`RenderError`](crate::render::RenderError); manifest decoding reports
//! [`ManifestError`](crate::manifest::ManifestError). [`RampartError`] wraps
//! all of them for callers that drive the whole pipeline.

use std::io;

use thiserror::Error;

use crate::{manifest::ManifestError, render::RenderError};

/// A construction-time failure.
///
/// Every variant aborts the session that raised it: the session keeps the
/// first error and rejects further mutation with
/// [`BuildError::SessionAborted`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("duplicate node key `{key}`")]
    DuplicateKey { key: String },

    #[error("node `{key}` has no usable asset: {reason}")]
    MissingAsset {
        key: String,
        asset: Option<String>,
        reason: String,
    },

    #[error("scope violation on region `{region}`: {reason}")]
    ScopeViolation { region: String, reason: String },

    #[error("edge endpoint `{key}` is not a declared node")]
    UnknownNode { key: String },

    #[error("region `{path}` is already declared under the same parent")]
    DuplicateRegion { path: String },

    #[error("session was aborted by an earlier error: {cause}")]
    SessionAborted { cause: Box<BuildError> },
}

impl BuildError {
    /// Returns the error that originally aborted the session.
    pub fn root_cause(&self) -> &BuildError {
        match self {
            BuildError::SessionAborted { cause } => cause.root_cause(),
            other => other,
        }
    }
}

/// The main error type for Rampart operations.
#[derive(Debug, Error)]
pub enum RampartError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ManifestError, src: String },

    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl RampartError {
    /// Create a new `Parse` error with the associated manifest source.
    pub fn new_parse_error(err: ManifestError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
