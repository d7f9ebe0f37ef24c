/// Convenience result type used across Montage.
pub type EditorResult<T> = Result<T, EditorError>;

/// Error taxonomy for editing, import and persistence operations.
///
/// Every variant is recoverable: an operation that fails leaves the scene, the clipboard and
/// snapshot storage exactly as they were before the call.
#[derive(thiserror::Error, Debug)]
pub enum EditorError {
    /// The operation needs an active object but nothing is selected.
    #[error("no selection: an active object is required")]
    NoSelection,

    /// A reference to an object or storage slot that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Paste was requested before anything was copied.
    #[error("clipboard is empty")]
    Empty,

    /// Image or video payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// A web/system font could not be loaded.
    #[error("font loading failed for '{family}': {reason}")]
    FontLoad {
        /// Requested font family.
        family: String,
        /// Loader-provided failure reason.
        reason: String,
    },

    /// A snapshot payload could not be parsed into valid object records.
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),

    /// Invalid caller-provided argument or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EditorError {
    /// Build a [`EditorError::NotFound`] value.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Build a [`EditorError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`EditorError::FontLoad`] value.
    pub fn font_load(family: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FontLoad {
            family: family.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`EditorError::MalformedSnapshot`] value.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedSnapshot(msg.into())
    }

    /// Build a [`EditorError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
