//! Error types for filter execution.

use thiserror::Error;

/// A specialized Result type for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors that can occur while running a filter.
///
/// Evaluating a condition never fails; these errors come from decoding
/// filter input and from the offloaded worker.
#[derive(Debug, Error)]
pub enum FilterError {
    /// The offloaded worker reported a failure for this request.
    #[error("filter worker failed: {message}")]
    Worker {
        /// The failure message reported by the worker.
        message: String,
    },

    /// Filter input could not be decoded.
    #[error("invalid filter input: {0}")]
    Json(#[from] serde_json::Error),
}

impl FilterError {
    /// Creates a worker failure error.
    pub fn worker(message: impl Into<String>) -> Self {
        FilterError::Worker {
            message: message.into(),
        }
    }
}
