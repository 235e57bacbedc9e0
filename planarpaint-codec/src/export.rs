//! PNG export with embedded metadata (tEXt chunks).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use planarpaint_core::Document;
use tracing::debug;

use crate::buffer::RgbaBuffer;

/// Value of the `Software` tEXt chunk.
pub const SOFTWARE: &str = "PlanarPaint";

fn metadata_pairs(document: &Document) -> Vec<(String, String)> {
    vec![
        ("Software".into(), SOFTWARE.into()),
        ("PlanarPaint.Mode".into(), document.mode().label().into()),
        (
            "PlanarPaint.Resolution".into(),
            format!("{}x{}", document.width(), document.height()),
        ),
    ]
}

/// Encode a document as an RGBA8 PNG into `writer`.
///
/// Uses the `png` crate directly so the mode and resolution can ride along
/// as tEXt chunks.
pub fn encode_png<W: Write>(document: &Document, writer: W) -> crate::Result<()> {
    let buffer = RgbaBuffer::from_document(document);

    let mut encoder = png::Encoder::new(writer, buffer.width, buffer.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    for (key, value) in metadata_pairs(document) {
        encoder.add_text_chunk(key, value)?;
    }

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&buffer.pixels)?;
    png_writer.finish()?;
    Ok(())
}

/// Write a document to `path` as a PNG file.
pub fn export_png(document: &Document, path: &Path) -> crate::Result<()> {
    let file = File::create(path)?;
    encode_png(document, BufWriter::new(file))?;
    debug!(
        "Exported PNG {}x{} to {}",
        document.width(),
        document.height(),
        path.display()
    );
    Ok(())
}
