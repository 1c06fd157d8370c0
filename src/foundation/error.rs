/// Convenience result type used across graymap.
pub type GraymapResult<T> = Result<T, GraymapError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum GraymapError {
    /// Caller-supplied data violates a precondition (shape, depth, unloaded buffer).
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed raster data or header.
    #[error("format error: {0}")]
    Format(String),

    /// Errors raised while executing a transform.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors when serializing or deserializing operation scripts.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Filesystem errors, with the path that was being accessed.
    #[error("io error on '{path}': {source}")]
    Io {
        /// Path being read or written.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GraymapError {
    /// Build a [`GraymapError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GraymapError::Format`] value.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Build a [`GraymapError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`GraymapError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`GraymapError::Io`] value for `path`.
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
