use planarpaint_core::{EditorState, StateSnapshot};

use crate::command::{Command, CommandMeta};

/// Swap the whole document, view, and palette (project load, ILBM import).
#[derive(Debug)]
pub struct ReplaceStateCommand {
    meta: CommandMeta,
    before: StateSnapshot,
    after: StateSnapshot,
}

impl ReplaceStateCommand {
    pub fn new(meta: CommandMeta, before: StateSnapshot, after: StateSnapshot) -> Self {
        Self {
            meta,
            before,
            after,
        }
    }

    pub fn load_project(before: StateSnapshot, after: StateSnapshot) -> Self {
        Self::new(CommandMeta::new("load-project", "Load project"), before, after)
    }

    pub fn import_ilbm(before: StateSnapshot, after: StateSnapshot) -> Self {
        Self::new(CommandMeta::new("import-iff", "Import ILBM"), before, after)
    }
}

impl Command for ReplaceStateCommand {
    fn meta(&self) -> &CommandMeta {
        &self.meta
    }

    fn apply(&mut self, state: &mut EditorState) {
        state.replace_all(&self.after);
    }

    fn revert(&mut self, state: &mut EditorState) {
        state.replace_all(&self.before);
    }

    fn memory_size(&self) -> usize {
        let snapshot_size = |s: &StateSnapshot| s.document.pixel_count() * s.document.mode().bytes_per_pixel();
        snapshot_size(&self.before) + snapshot_size(&self.after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planarpaint_core::{DirectImage, Document};

    #[test]
    fn swaps_mode_and_back() {
        let mut state = EditorState::default();
        let before = state.snapshot();
        let mut after = state.snapshot();
        after.document = Document::Direct(DirectImage::new(3, 3).unwrap());
        after.view.set_zoom(8);

        let mut cmd = ReplaceStateCommand::import_ilbm(before.clone(), after);
        cmd.apply(&mut state);
        assert_eq!(state.document().width(), 3);
        assert_eq!(state.view().zoom, 8);
        cmd.revert(&mut state);
        assert_eq!(state.snapshot(), before);
        assert_eq!(cmd.meta().label, "Import ILBM");
    }
}
