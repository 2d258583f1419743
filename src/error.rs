//! Error types for the text-watermark crate.

/// Errors that can occur while rendering or applying a watermark.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The watermark text is empty, so there is nothing to stamp.
    #[error("watermark text is empty")]
    EmptyText,

    /// The outline font could not be parsed.
    #[error("failed to load font: {0}")]
    FontLoad(#[from] ab_glyph::InvalidFont),

    /// The JSON configuration document is malformed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// An error occurred during image decoding or encoding.
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
