//! Error types for the spy and its collaborators.

use thiserror::Error;

/// Failure reported by a [`MatchStore`](super::MatchStore) backend
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store backend unavailable: {0}")]
    Unavailable(String),
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to (de)serialize entries: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure raised by a [`Matcher`](super::Matcher) while evaluating a request,
/// as opposed to a plain "did not match" verdict
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Matcher failed: {0}")]
pub struct MatcherError(pub String);

/// Errors surfaced by spy operations
#[derive(Error, Debug)]
pub enum SpyError {
    #[error("Failed to generate entry id: {0}")]
    IdGeneration(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
