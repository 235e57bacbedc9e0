use thiserror::Error;

/// Errors originating from the document model.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid document dimensions: {width}×{height} (must be > 0)")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("pixel buffer length mismatch: expected {expected}, got {actual}")]
    PixelLengthMismatch { expected: usize, actual: usize },
}
