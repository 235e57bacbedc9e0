//! ILBM import as one undoable whole-state replacement.

use std::fs;
use std::path::Path;

use tracing::info;

use planarpaint_codec::decode_ilbm;
use planarpaint_core::palette::{DEFAULT_BACKGROUND_INDEX, DEFAULT_FOREGROUND_INDEX};
use planarpaint_core::{Palette, StateSnapshot};

use crate::command::CommandMeta;
use crate::commands::ReplaceStateCommand;
use crate::editor::{Editor, ExecuteMode};
use crate::error::AppError;

/// Decode an ILBM and replace the document, palette, and pan with it.
///
/// The zoom is kept, the pan resets to the origin, and the drawing indices
/// reset to foreground 1 / background 0. Decode failures leave the editor
/// untouched.
pub fn import_ilbm_bytes(editor: &mut Editor, bytes: &[u8]) -> crate::Result<CommandMeta> {
    let decoded = decode_ilbm(bytes).map_err(AppError::Import)?;
    let colors = decoded.palette.clone();
    let cycles = decoded.cycles.clone().unwrap_or_default();
    let document = decoded.into_document().map_err(AppError::Import)?;

    let mut view = *editor.state().view();
    view.offset_x = 0;
    view.offset_y = 0;

    let after = StateSnapshot {
        document,
        view,
        palette: Palette::new(
            colors,
            DEFAULT_FOREGROUND_INDEX,
            DEFAULT_BACKGROUND_INDEX,
            cycles,
        ),
    };
    let before = editor.state().snapshot();
    Ok(editor.execute(
        ReplaceStateCommand::import_ilbm(before, after),
        ExecuteMode::Apply,
    ))
}

pub fn import_ilbm_file(editor: &mut Editor, path: &Path) -> crate::Result<CommandMeta> {
    let bytes = fs::read(path)?;
    let meta = import_ilbm_bytes(editor, &bytes)?;
    let state = editor.state();
    info!(
        "Imported {} ({}x{}, {} colors, {} cycle ranges)",
        path.display(),
        state.document().width(),
        state.document().height(),
        state.palette().len(),
        state.palette().cycles().len()
    );
    Ok(meta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_is_wrapped_and_leaves_state() {
        let mut editor = Editor::default();
        let before = editor.state().snapshot();
        let err = import_ilbm_bytes(&mut editor, b"definitely not an iff").unwrap_err();
        assert!(err.to_string().starts_with("failed to import ILBM: "));
        assert_eq!(editor.state().snapshot(), before);
        assert!(!editor.can_undo());
    }
}
