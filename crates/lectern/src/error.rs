//! Error types for the Lectern library.

use thiserror::Error;

/// Main error type for Lectern operations.
#[derive(Debug, Error)]
pub enum LecternError {
    /// A referenced review, comment, professor, or pseudonym is absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The actor lacks the required relationship to the resource.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The stated professor does not teach the stated course.
    #[error("Invalid association: {0}")]
    InvalidAssociation(String),

    /// A concurrent edit lost the race on a version append.
    #[error("Version conflict: expected version {expected}, found {actual}")]
    Conflict {
        /// The version the edit was based on.
        expected: u32,
        /// The version actually current in the store.
        actual: u32,
    },

    /// A rating is out of range or a required field is missing.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Error saving or loading a store snapshot.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Lectern operations.
pub type Result<T> = std::result::Result<T, LecternError>;
