//! Interleaved bitplane deinterleaving and ByteRun1 decompression.

use crate::chunks::BitmapHeader;
use crate::error::CodecError;

/// Decode one ByteRun1 row of exactly `out.len()` bytes starting at
/// `source[offset]`. Returns the offset just past the consumed input.
///
/// Control byte `n`: `0..=127` copies `n + 1` literal bytes, `-127..=-1`
/// repeats the next byte `-n + 1` times, `-128` is skipped.
pub fn unpack_byte_run_row(source: &[u8], mut offset: usize, out: &mut [u8]) -> crate::Result<usize> {
    let row_bytes = out.len();
    let mut written = 0usize;

    while written < row_bytes {
        let control = *source.get(offset).ok_or(CodecError::UnexpectedEndOfBody)? as i8;
        offset += 1;
        match control {
            0..=127 => {
                let len = control as usize + 1;
                if written + len > row_bytes {
                    return Err(CodecError::RowOverflow);
                }
                let literal = source
                    .get(offset..offset + len)
                    .ok_or(CodecError::UnexpectedEndOfBody)?;
                out[written..written + len].copy_from_slice(literal);
                offset += len;
                written += len;
            }
            -127..=-1 => {
                let len = (-(control as i16)) as usize + 1;
                if written + len > row_bytes {
                    return Err(CodecError::RowOverflow);
                }
                let value = *source.get(offset).ok_or(CodecError::UnexpectedEndOfBody)?;
                offset += 1;
                out[written..written + len].fill(value);
                written += len;
            }
            -128 => {}
        }
    }
    Ok(offset)
}

/// OR one plane's scanline into the output row: bit `7 - (x % 8)` of byte
/// `x / 8` sets bit `plane` of pixel `x`.
fn merge_plane_row(plane_data: &[u8], row: &mut [u8], plane: u8) {
    let bit = 1u8 << plane;
    for (x, px) in row.iter_mut().enumerate() {
        if plane_data[x >> 3] & (0x80 >> (x & 7)) != 0 {
            *px |= bit;
        }
    }
}

/// Turn an ILBM `BODY` into one palette index per pixel, row-major.
///
/// Each scanline stores `bitplanes` consecutive planes of
/// [`BitmapHeader::row_bytes`] bytes each, optionally ByteRun1-compressed
/// per plane row. Masking planes are not supported.
pub fn decode_bitplanes(header: &BitmapHeader, body: &[u8]) -> crate::Result<Vec<u8>> {
    let planes = header.bitplanes;
    if !(1..=8).contains(&planes) {
        return Err(CodecError::UnsupportedBitplanes(planes));
    }
    let width = header.width as usize;
    let height = header.height as usize;
    let row_bytes = header.row_bytes();
    let mut output = vec![0u8; width * height];
    if width == 0 {
        return Ok(output);
    }

    match header.compression {
        0 => {
            let mut offset = 0usize;
            for row in output.chunks_exact_mut(width) {
                for plane in 0..planes {
                    let plane_data = body
                        .get(offset..offset + row_bytes)
                        .ok_or(CodecError::UnexpectedEndOfBody)?;
                    merge_plane_row(plane_data, row, plane);
                    offset += row_bytes;
                }
            }
        }
        1 => {
            let mut offset = 0usize;
            let mut plane_data = vec![0u8; row_bytes];
            for row in output.chunks_exact_mut(width) {
                for plane in 0..planes {
                    offset = unpack_byte_run_row(body, offset, &mut plane_data)?;
                    merge_plane_row(&plane_data, row, plane);
                }
            }
        }
        other => return Err(CodecError::UnsupportedCompression(other)),
    }
    Ok(output)
}
