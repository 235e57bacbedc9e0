use thiserror::Error;

use planarpaint_codec::CodecError;
use planarpaint_core::CoreError;

/// Reasons a project snapshot is rejected.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("unsupported project version {0}")]
    UnsupportedVersion(u32),

    #[error("document dimensions must be positive (got {width}×{height})")]
    InvalidDimensions { width: i64, height: i64 },

    #[error("indexed project requires palette data")]
    MissingPalette,

    #[error("pixel data length mismatch for {mode} project: expected {expected} bytes, got {actual}")]
    PixelLengthMismatch {
        mode: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid base64 pixel data: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("malformed project JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Top-level error for the editing engine and CLI.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to import ILBM: {0}")]
    Import(#[source] CodecError),

    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
