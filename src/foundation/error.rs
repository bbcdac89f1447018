/// Convenience result type used across slidecraft.
pub type SlideResult<T> = Result<T, SlideError>;

/// Top-level error taxonomy used by editor and renderer APIs.
///
/// Most editor operations cannot fail: degenerate geometry is clamped and structural no-ops
/// are silent. Errors surface only at the IO, decode and raster boundaries.
#[derive(thiserror::Error, Debug)]
pub enum SlideError {
    /// Invalid user-provided or deck data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while decoding image bytes or registering fonts.
    #[error("decode error: {0}")]
    Decode(String),

    /// Errors while executing a render plan or encoding its output.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SlideError {
    /// Build a [`SlideError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SlideError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`SlideError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`SlideError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for SlideError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
