use planarpaint_core::{Canvas, Document, PaletteColor};
use rayon::prelude::*;

/// A flattened RGBA8 image ready for encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaBuffer {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data, 4 bytes per pixel, row-major order.
    pub pixels: Vec<u8>,
}

impl RgbaBuffer {
    /// Create a fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width as usize * height as usize * 4],
        }
    }

    /// Flatten a document: indexed pixels are looked up in the embedded
    /// color table (missing entries become transparent black), direct pixels
    /// are unpacked as-is.
    pub fn from_document(document: &Document) -> Self {
        let mut buffer = Self::new(document.width(), document.height());
        match document {
            Document::Indexed(img) => {
                let table = img.palette();
                buffer
                    .pixels
                    .par_chunks_mut(4)
                    .zip(img.pixels().par_iter())
                    .for_each(|(pixel, &index)| {
                        let c = table
                            .get(index as usize)
                            .copied()
                            .unwrap_or(PaletteColor::new(0, 0, 0, 0));
                        pixel.copy_from_slice(&c.to_array());
                    });
            }
            Document::Direct(img) => {
                buffer
                    .pixels
                    .par_chunks_mut(4)
                    .zip(img.pixels().par_iter())
                    .for_each(|(pixel, &packed)| {
                        pixel.copy_from_slice(&packed.to_le_bytes());
                    });
            }
        }
        buffer
    }

    /// RGBA of the pixel at `(x, y)`, if inside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }
}

/// Flatten a document to `r, g, b, a` bytes.
pub fn document_to_rgba(document: &Document) -> Vec<u8> {
    RgbaBuffer::from_document(document).pixels
}
