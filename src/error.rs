//! Error types for record composition and availability resolution.
//!
//! This module provides the [`LiberatorError`] type for all library operations
//! and the [`Result`] convenience type.

use thiserror::Error;

/// Error type for all composition and availability operations.
///
/// A record that simply does not exist (or is suppressed) is not an error for
/// the public operations: they return `Ok(None)` or an empty collection. The
/// variants below describe genuine failures of a single record.
#[derive(Error, Debug)]
pub enum LiberatorError {
    /// A bib, holding, or item is absent or suppressed.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A record lacks a required control field (`001`) or cannot be composed.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// The data provider or the record codec failed.
    #[error("Upstream failure: {0}")]
    Upstream(String),

    /// Order data could not be interpreted chronologically.
    #[error("Ambiguous order data: {0}")]
    AmbiguousOrder(String),
}

impl From<serde_json::Error> for LiberatorError {
    fn from(err: serde_json::Error) -> Self {
        LiberatorError::Upstream(format!("JSON codec: {err}"))
    }
}

/// Convenience type alias for [`std::result::Result`] with [`LiberatorError`].
pub type Result<T> = std::result::Result<T, LiberatorError>;

/// Map [`LiberatorError::NotFound`] to `Ok(None)`, keeping every other error.
pub(crate) fn found<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(LiberatorError::NotFound(_)) => Ok(None),
        Err(err) => Err(err),
    }
}
