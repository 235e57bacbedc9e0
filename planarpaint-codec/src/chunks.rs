//! IFF `FORM ILBM` chunk walking and `BMHD` parsing.

use tracing::trace;

use crate::error::CodecError;

/// Minimum size of a `BMHD` payload.
pub const BMHD_LEN: usize = 20;

/// The fields of a `BMHD` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BitmapHeader {
    pub width: u16,
    pub height: u16,
    pub bitplanes: u8,
    pub masking: u8,
    pub compression: u8,
    pub transparent_color: u16,
    pub x_aspect: u8,
    pub y_aspect: u8,
    pub page_width: u16,
    pub page_height: u16,
}

impl BitmapHeader {
    /// Parse a `BMHD` payload (big-endian fields).
    pub fn parse(data: &[u8]) -> crate::Result<Self> {
        if data.len() < BMHD_LEN {
            return Err(CodecError::HeaderTooShort(data.len()));
        }
        let u16_at = |off: usize| u16::from_be_bytes([data[off], data[off + 1]]);
        Ok(Self {
            width: u16_at(0),
            height: u16_at(2),
            bitplanes: data[8],
            masking: data[9],
            compression: data[10],
            transparent_color: u16_at(12),
            x_aspect: data[14],
            y_aspect: data[15],
            page_width: u16_at(16),
            page_height: u16_at(18),
        })
    }

    /// Bytes per plane per scanline: the width rounded up to a 16-bit word.
    pub fn row_bytes(&self) -> usize {
        (self.width as usize).div_ceil(16) * 2
    }
}

/// The chunks an ILBM decode needs, borrowed from the input buffer.
#[derive(Debug, Clone, Copy)]
pub struct IlbmChunks<'a> {
    pub header: BitmapHeader,
    pub cmap: &'a [u8],
    pub body: &'a [u8],
    pub crng: Option<&'a [u8]>,
}

/// Walk the chunks of a `FORM ILBM` buffer.
///
/// Chunk payloads that claim more bytes than remain are cut at the end of
/// the buffer. Odd-length payloads are followed by one pad byte. Unknown
/// chunks are skipped; when a chunk id repeats the last one wins.
pub fn parse_chunks(bytes: &[u8]) -> crate::Result<IlbmChunks<'_>> {
    if bytes.len() < 12 || &bytes[0..4] != b"FORM" {
        return Err(CodecError::NotIff);
    }
    if &bytes[8..12] != b"ILBM" {
        return Err(CodecError::UnsupportedFormType(
            String::from_utf8_lossy(&bytes[8..12]).into_owned(),
        ));
    }

    let mut header = None;
    let mut cmap = None;
    let mut body = None;
    let mut crng = None;

    let mut offset = 12usize;
    while offset + 8 <= bytes.len() {
        let id = &bytes[offset..offset + 4];
        let size = u32::from_be_bytes([
            bytes[offset + 4],
            bytes[offset + 5],
            bytes[offset + 6],
            bytes[offset + 7],
        ]) as usize;
        let start = offset + 8;
        let end = start.saturating_add(size).min(bytes.len());
        let data = &bytes[start..end];
        trace!(
            "ILBM chunk {} ({} bytes) at {}",
            String::from_utf8_lossy(id),
            size,
            offset
        );

        match id {
            b"BMHD" => header = Some(BitmapHeader::parse(data)?),
            b"CMAP" => cmap = Some(data),
            b"BODY" => body = Some(data),
            b"CRNG" => crng = Some(data),
            _ => {}
        }

        offset = start.saturating_add(size).saturating_add(size % 2);
    }

    match (header, cmap, body) {
        (Some(header), Some(cmap), Some(body)) => Ok(IlbmChunks {
            header,
            cmap,
            body,
            crng,
        }),
        _ => Err(CodecError::MissingChunks),
    }
}
