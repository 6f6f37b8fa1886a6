use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the compositing core.
///
/// Painting and coordinate mapping never produce these; they clamp or no-op instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("failed to decode image: {0}")]
    DecodeError(#[source] image::ImageError),

    #[error("pixel ({x}, {y}) is outside a {width}x{height} buffer")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("invalid mask shape: {0}")]
    InvalidMaskShape(String),

    #[error("failed to encode image: {0}")]
    EncodeError(#[source] image::ImageError),

    #[error("inference backend unavailable: {0}")]
    InferenceUnavailable(String),

    #[error("inference failed: {0}")]
    InferenceFailed(String),

    #[error("brush radius must be at least 1")]
    InvalidBrushRadius,

    #[error("an inference request is already in flight")]
    Busy,

    #[error("no image loaded")]
    NoImage,

    #[error("no processed image to export")]
    NothingToExport,
}
