//! Typed failures surfaced at the registry boundary.
//!
//! Kernels validate their inputs and report impossible buffers as
//! [`CatalogError::InvalidParameters`]. Numeric degeneracies with a safe
//! fallback (empty k-means cluster, zero-area spectrum) are handled inside
//! the kernel and never reach this type.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Requested operation name is not registered.
    #[error("unknown operation: {0:?}")]
    UnknownOperation(String),

    /// Input bytes are not a decodable image.
    #[error("failed to decode image: {0}")]
    DecodeFailure(String),

    /// Output raster could not be written to the container format.
    #[error("failed to encode image: {0}")]
    EncodeFailure(String),

    /// Buffer with impossible dimensions or a channel-count mismatch.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("i/o error: {0}")]
    Io(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl CatalogError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameters(msg.into())
    }
}
