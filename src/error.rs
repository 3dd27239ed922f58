use thiserror::Error;

/// Errors surfaced by the editor, collector and report operations.
///
/// `UnsupportedMediaType` and `Validation` block the attempted action.
/// `PersistedStateCorrupt` is recoverable: callers treat the document as absent.
#[derive(Debug, Error)]
pub enum SketchError {
    #[error("unsupported media type '{0}': upload an image or a PDF file")]
    UnsupportedMediaType(String),

    #[error("{0}")]
    Validation(String),

    #[error("stored document '{key}' is corrupt: {reason}")]
    PersistedStateCorrupt { key: String, reason: String },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl SketchError {
    pub fn validation(message: impl Into<String>) -> Self {
        SketchError::Validation(message.into())
    }

    pub fn corrupt(key: &str, reason: impl Into<String>) -> Self {
        SketchError::PersistedStateCorrupt {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

pub type SketchResult<T> = std::result::Result<T, SketchError>;
