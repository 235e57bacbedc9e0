pub mod bitplanes;
pub mod buffer;
pub mod chunks;
pub mod crng;
pub mod error;
pub mod export;
pub mod ilbm;

pub use bitplanes::{decode_bitplanes, unpack_byte_run_row};
pub use buffer::{document_to_rgba, RgbaBuffer};
pub use chunks::{parse_chunks, BitmapHeader, IlbmChunks};
pub use crng::parse_crng;
pub use error::CodecError;
pub use export::{encode_png, export_png};
pub use ilbm::{decode_ilbm, DecodedIlbm};

/// Convenience result type for the codec crate.
pub type Result<T> = std::result::Result<T, CodecError>;
