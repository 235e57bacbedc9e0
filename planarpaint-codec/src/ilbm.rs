//! Full ILBM decode: chunks → bitplanes → indexed pixels + palette + cycles.

use planarpaint_core::{CycleRange, Document, IndexedImage, PaletteColor};
use tracing::debug;

use crate::bitplanes::decode_bitplanes;
use crate::chunks::{parse_chunks, BitmapHeader};
use crate::crng::parse_crng;
use crate::error::CodecError;

/// A decoded ILBM picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedIlbm {
    pub header: BitmapHeader,
    pub width: u32,
    pub height: u32,
    /// One palette index per pixel, row-major.
    pub pixels: Vec<u8>,
    /// Opaque colors from `CMAP`, in file order.
    pub palette: Vec<PaletteColor>,
    /// Present only when the file has a `CRNG` chunk.
    pub cycles: Option<Vec<CycleRange>>,
}

impl DecodedIlbm {
    /// Convert into an indexed document carrying the file's colors and cycles.
    pub fn into_document(self) -> crate::Result<Document> {
        let image = IndexedImage::from_pixels(
            self.width,
            self.height,
            self.pixels,
            self.palette,
            self.cycles.unwrap_or_default(),
        )?;
        Ok(Document::Indexed(image))
    }
}

/// Decode a `FORM ILBM` file.
pub fn decode_ilbm(bytes: &[u8]) -> crate::Result<DecodedIlbm> {
    let chunks = parse_chunks(bytes)?;
    let header = chunks.header;
    let (width, height) = (u32::from(header.width), u32::from(header.height));
    if width == 0 || height == 0 {
        return Err(CodecError::InvalidDimensions { width, height });
    }

    let pixels = decode_bitplanes(&header, chunks.body)?;
    let palette = parse_cmap(chunks.cmap);
    let cycles = chunks.crng.map(parse_crng);

    debug!(
        "Decoded ILBM {}x{}, {} planes, compression {}, {} colors, {} cycle ranges",
        width,
        height,
        header.bitplanes,
        header.compression,
        palette.len(),
        cycles.as_ref().map_or(0, Vec::len)
    );

    Ok(DecodedIlbm {
        header,
        width,
        height,
        pixels,
        palette,
        cycles,
    })
}

/// Each RGB triple becomes one opaque color; a trailing partial triple is dropped.
fn parse_cmap(data: &[u8]) -> Vec<PaletteColor> {
    data.chunks_exact(3)
        .map(|rgb| PaletteColor::opaque(rgb[0], rgb[1], rgb[2]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cmap_drops_partial_triple() {
        let colors = parse_cmap(&[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(
            colors,
            vec![PaletteColor::opaque(1, 2, 3), PaletteColor::opaque(4, 5, 6)]
        );
    }

    #[test]
    fn into_document_keeps_cycles() {
        let decoded = DecodedIlbm {
            header: BitmapHeader::default(),
            width: 2,
            height: 1,
            pixels: vec![0, 1],
            palette: vec![PaletteColor::BLACK, PaletteColor::opaque(9, 9, 9)],
            cycles: Some(vec![CycleRange::new(5, 0, 1, true)]),
        };
        let doc = decoded.into_document().unwrap();
        let img = doc.as_indexed().unwrap();
        assert_eq!(img.cycles().len(), 1);
        assert_eq!(doc.sample(1, 0), Some(1));
    }

    #[test]
    fn into_document_rejects_bad_pixel_length() {
        let decoded = DecodedIlbm {
            header: BitmapHeader::default(),
            width: 2,
            height: 2,
            pixels: vec![0],
            palette: Vec::new(),
            cycles: None,
        };
        assert!(matches!(decoded.into_document(), Err(CodecError::Core(_))));
    }
}
