/// Result alias used across the crate.
pub type WobbleResult<T> = Result<T, WobbleError>;

/// Errors surfaced by scene, animation, layer and render operations.
#[derive(thiserror::Error, Debug)]
pub enum WobbleError {
    /// Caller bug: out-of-range enum discriminant, negative duration, mismatched value kind,
    /// stale drawable handle.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Malformed configuration or scene description.
    #[error("validation error: {0}")]
    Validation(String),

    /// Failure reported by a render backend.
    #[error("render error: {0}")]
    Render(String),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, with its source chain preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WobbleError {
    /// Build an [`WobbleError::InvalidArgument`].
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Build a [`WobbleError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`WobbleError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`WobbleError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for WobbleError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
