//! Error types for boxcat.

use thiserror::Error;

/// Primary error type for bounding box concatenation.
#[derive(Error, Debug)]
pub enum BoxcatError {
    /// An alignment references an identifier that no indexed record carries.
    #[error("annotation not found: {0}")]
    MissingAnnotation(String),

    /// A coordinate list is too short to yield a top-left and bottom-right corner.
    #[error("malformed bounding box: expected at least 4 points, got {points}")]
    MalformedBox { points: usize },

    #[error("invalid annotation {id}: property `{property}` {msg}")]
    InvalidAnnotation {
        id: String,
        property: &'static str,
        msg: String,
    },

    #[error("invalid parameter `{name}`: {msg}")]
    InvalidParameter { name: String, msg: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl BoxcatError {
    pub(crate) fn invalid_annotation(
        id: impl Into<String>,
        property: &'static str,
        msg: impl Into<String>,
    ) -> Self {
        Self::InvalidAnnotation {
            id: id.into(),
            property,
            msg: msg.into(),
        }
    }
}

/// Convenience Result type alias for BoxcatError.
pub type Result<T> = std::result::Result<T, BoxcatError>;
