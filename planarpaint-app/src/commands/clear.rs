use planarpaint_core::{EditorState, PixelSnapshot};

use super::restore_pixels;
use crate::command::{Command, CommandMeta};

/// Fill the whole document with one value.
#[derive(Debug)]
pub struct ClearCommand {
    meta: CommandMeta,
    value: u32,
    before: PixelSnapshot,
}

impl ClearCommand {
    /// `value` is a raw pixel value (see [`EditorState::draw_value`]).
    pub fn new(state: &EditorState, value: u32) -> Self {
        Self {
            meta: CommandMeta::new("clear", "Clear"),
            value,
            before: state.document().snapshot(),
        }
    }
}

impl Command for ClearCommand {
    fn meta(&self) -> &CommandMeta {
        &self.meta
    }

    fn apply(&mut self, state: &mut EditorState) {
        state.edit_document(|doc| doc.clear(self.value));
    }

    fn revert(&mut self, state: &mut EditorState) {
        restore_pixels(state, &self.before);
    }

    fn memory_size(&self) -> usize {
        self.before.memory_size()
    }
}
