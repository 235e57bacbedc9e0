//! The concrete command families.

mod clear;
mod palette;
mod replace;
mod shape;
mod stroke;

pub use clear::ClearCommand;
pub use palette::{PaletteChangeCommand, PaletteOp};
pub use replace::ReplaceStateCommand;
pub use shape::{Shape, ShapeCommand};
pub use stroke::StrokeCommand;

use planarpaint_core::{EditorState, PixelSnapshot};

/// Copy a pixel snapshot back into the live document.
///
/// A snapshot from a document of another mode or size is ignored.
pub(crate) fn restore_pixels(state: &mut EditorState, snapshot: &PixelSnapshot) {
    state.edit_document(|doc| {
        if !doc.restore(snapshot) {
            tracing::debug!("Skipped pixel restore: document mode or size changed");
        }
    });
}
