//! Error types for the engine client.

use thiserror::Error;

use crate::node::Pk;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur when interacting with the workflow engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Engine API returned an error response.
    #[error("Engine API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// No installed code matches the given label.
    #[error("Code not found: {0}")]
    CodeNotFound(String),

    /// No node with the given pk exists in the engine's store.
    #[error("Node not found: pk={0}")]
    NodeNotFound(Pk),

    /// A resolved node lacks a required output link.
    #[error("Node pk={pk} has no '{link}' output")]
    MissingOutput { pk: Pk, link: String },

    /// The engine rejected the submission request.
    #[error("Submission rejected: {0}")]
    Submission(String),
}
