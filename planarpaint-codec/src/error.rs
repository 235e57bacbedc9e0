use thiserror::Error;

/// Errors from ILBM decoding and PNG export.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("not an IFF FORM file")]
    NotIff,

    #[error("unsupported FORM type {0:?}")]
    UnsupportedFormType(String),

    #[error("BMHD chunk too short: {0} bytes (need 20)")]
    HeaderTooShort(usize),

    #[error("missing ILBM chunks (BMHD/CMAP/BODY required)")]
    MissingChunks,

    #[error("invalid image dimensions: {width}×{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("unsupported bitplane count {0}")]
    UnsupportedBitplanes(u8),

    #[error("unsupported ILBM compression {0}")]
    UnsupportedCompression(u8),

    #[error("unexpected end of ILBM BODY data")]
    UnexpectedEndOfBody,

    #[error("decoded ILBM row exceeds expected length")]
    RowOverflow,

    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] planarpaint_core::CoreError),
}
