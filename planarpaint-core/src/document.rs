use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::palette::{CycleRange, Palette, PaletteColor};

/// Default size of a freshly created document.
pub const DEFAULT_WIDTH: u32 = 320;
pub const DEFAULT_HEIGHT: u32 = 200;

/// Pixel format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageMode {
    /// One byte per pixel, indexing the embedded color table.
    #[serde(rename = "indexed8")]
    Indexed8,
    /// One packed RGBA `u32` per pixel.
    #[serde(rename = "rgba32")]
    Rgba32,
}

impl ImageMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Indexed8 => "indexed8",
            Self::Rgba32 => "rgba32",
        }
    }

    /// Bytes per pixel in the serialized buffer.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Indexed8 => 1,
            Self::Rgba32 => 4,
        }
    }
}

/// Number of pixels for the given dimensions, rejecting empty images.
pub fn pixel_count(width: u32, height: u32) -> crate::Result<usize> {
    if width == 0 || height == 0 {
        return Err(CoreError::InvalidDimensions { width, height });
    }
    Ok(width as usize * height as usize)
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

/// A row-major pixel grid the drawing primitives can write into.
pub trait Canvas {
    type Pixel: Copy + PartialEq;

    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn pixels(&self) -> &[Self::Pixel];
    fn pixels_mut(&mut self) -> &mut [Self::Pixel];

    /// Buffer index of `(x, y)`, or `None` outside `[0, width) × [0, height)`.
    #[inline]
    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width() || y as u32 >= self.height() {
            return None;
        }
        Some(y as usize * self.width() as usize + x as usize)
    }

    #[inline]
    fn get(&self, x: i32, y: i32) -> Option<Self::Pixel> {
        self.index_of(x, y).map(|i| self.pixels()[i])
    }

    /// Write one pixel; out-of-bounds writes are skipped and return `false`.
    #[inline]
    fn set(&mut self, x: i32, y: i32, value: Self::Pixel) -> bool {
        match self.index_of(x, y) {
            Some(i) => {
                self.pixels_mut()[i] = value;
                true
            }
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Indexed image
// ---------------------------------------------------------------------------

/// Palette-indexed pixels with the document's own copy of the color table.
///
/// The embedded palette and cycles are a read view: the editor rewrites them
/// from its palette state after every palette change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    palette: Vec<PaletteColor>,
    cycles: Vec<CycleRange>,
}

impl IndexedImage {
    /// A blank image (every pixel index 0).
    pub fn new(width: u32, height: u32, palette: Vec<PaletteColor>) -> crate::Result<Self> {
        let len = pixel_count(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![0; len],
            palette,
            cycles: Vec::new(),
        })
    }

    pub fn from_pixels(
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        palette: Vec<PaletteColor>,
        cycles: Vec<CycleRange>,
    ) -> crate::Result<Self> {
        let expected = pixel_count(width, height)?;
        if pixels.len() != expected {
            return Err(CoreError::PixelLengthMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
            palette,
            cycles,
        })
    }

    pub fn palette(&self) -> &[PaletteColor] {
        &self.palette
    }

    pub fn cycles(&self) -> &[CycleRange] {
        &self.cycles
    }

    pub(crate) fn sync_from(&mut self, palette: &Palette) {
        self.palette.clear();
        self.palette.extend_from_slice(palette.colors());
        self.cycles.clear();
        self.cycles.extend_from_slice(palette.cycles());
    }
}

impl Canvas for IndexedImage {
    type Pixel = u8;

    fn width(&self) -> u32 {
        self.width
    }
    fn height(&self) -> u32 {
        self.height
    }
    fn pixels(&self) -> &[u8] {
        &self.pixels
    }
    fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }
}

// ---------------------------------------------------------------------------
// Direct-color image
// ---------------------------------------------------------------------------

/// Direct-color pixels, one packed RGBA value each (see [`PaletteColor::pack`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectImage {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl DirectImage {
    /// A fully transparent image.
    pub fn new(width: u32, height: u32) -> crate::Result<Self> {
        let len = pixel_count(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![0; len],
        })
    }

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u32>) -> crate::Result<Self> {
        let expected = pixel_count(width, height)?;
        if pixels.len() != expected {
            return Err(CoreError::PixelLengthMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build from a flat `r, g, b, a` byte buffer (4 bytes per pixel).
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> crate::Result<Self> {
        let expected = pixel_count(width, height)? * 4;
        if bytes.len() != expected {
            return Err(CoreError::PixelLengthMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|px| u32::from_le_bytes([px[0], px[1], px[2], px[3]]))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|px| px.to_le_bytes()).collect()
    }
}

impl Canvas for DirectImage {
    type Pixel = u32;

    fn width(&self) -> u32 {
        self.width
    }
    fn height(&self) -> u32 {
        self.height
    }
    fn pixels(&self) -> &[u32] {
        &self.pixels
    }
    fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// The image being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    Indexed(IndexedImage),
    Direct(DirectImage),
}

impl Document {
    /// A blank indexed document using `palette`'s colors and cycles.
    pub fn blank_indexed(width: u32, height: u32, palette: &Palette) -> crate::Result<Self> {
        let mut image = IndexedImage::new(width, height, Vec::new())?;
        image.sync_from(palette);
        Ok(Self::Indexed(image))
    }

    pub fn mode(&self) -> ImageMode {
        match self {
            Self::Indexed(_) => ImageMode::Indexed8,
            Self::Direct(_) => ImageMode::Rgba32,
        }
    }

    pub fn width(&self) -> u32 {
        match self {
            Self::Indexed(img) => img.width,
            Self::Direct(img) => img.width,
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Self::Indexed(img) => img.height,
            Self::Direct(img) => img.height,
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height()
    }

    /// Raw pixel value at `(x, y)`: the palette index for indexed documents,
    /// the packed color for direct ones. `None` when out of bounds.
    pub fn sample(&self, x: i32, y: i32) -> Option<u32> {
        match self {
            Self::Indexed(img) => img.get(x, y).map(u32::from),
            Self::Direct(img) => img.get(x, y),
        }
    }

    pub fn as_indexed(&self) -> Option<&IndexedImage> {
        match self {
            Self::Indexed(img) => Some(img),
            Self::Direct(_) => None,
        }
    }

    pub fn as_direct(&self) -> Option<&DirectImage> {
        match self {
            Self::Indexed(_) => None,
            Self::Direct(img) => Some(img),
        }
    }

    /// Copy the pixel buffer.
    pub fn snapshot(&self) -> PixelSnapshot {
        match self {
            Self::Indexed(img) => PixelSnapshot::Indexed(img.pixels.clone()),
            Self::Direct(img) => PixelSnapshot::Direct(img.pixels.clone()),
        }
    }

    /// Copy a snapshot back into the live buffer.
    ///
    /// Snapshots taken from a document of another mode or size are ignored
    /// and `false` is returned.
    pub fn restore(&mut self, snapshot: &PixelSnapshot) -> bool {
        match (self, snapshot) {
            (Self::Indexed(img), PixelSnapshot::Indexed(px)) if img.pixels.len() == px.len() => {
                img.pixels.copy_from_slice(px);
                true
            }
            (Self::Direct(img), PixelSnapshot::Direct(px)) if img.pixels.len() == px.len() => {
                img.pixels.copy_from_slice(px);
                true
            }
            _ => false,
        }
    }

    /// Serialized pixel bytes: indices for indexed documents, `r, g, b, a`
    /// quadruples for direct ones.
    pub fn pixel_bytes(&self) -> Vec<u8> {
        match self {
            Self::Indexed(img) => img.pixels.clone(),
            Self::Direct(img) => img.to_rgba_bytes(),
        }
    }

    /// Rewrite the embedded color table and cycles from `palette`.
    /// Direct documents carry no palette and are left alone.
    pub(crate) fn sync_palette(&mut self, palette: &Palette) {
        if let Self::Indexed(img) = self {
            img.sync_from(palette);
        }
    }
}

impl Default for Document {
    /// A blank [`DEFAULT_WIDTH`]×[`DEFAULT_HEIGHT`] indexed document with the
    /// default palette.
    fn default() -> Self {
        let palette = Palette::default();
        Self::Indexed(IndexedImage {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            pixels: vec![0; DEFAULT_WIDTH as usize * DEFAULT_HEIGHT as usize],
            palette: palette.colors().to_vec(),
            cycles: Vec::new(),
        })
    }
}

/// A private copy of a document's pixels, held by commands for reversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixelSnapshot {
    Indexed(Vec<u8>),
    Direct(Vec<u32>),
}

impl PixelSnapshot {
    pub fn len(&self) -> usize {
        match self {
            Self::Indexed(px) => px.len(),
            Self::Direct(px) => px.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Approximate heap size in bytes.
    pub fn memory_size(&self) -> usize {
        match self {
            Self::Indexed(px) => px.len(),
            Self::Direct(px) => px.len() * 4,
        }
    }
}
