use tracing::debug;

use planarpaint_core::{EditorState, ViewSettings};

use crate::command::{Command, CommandMeta};
use crate::history::History;
use crate::preferences::EditorPreferences;

/// Whether [`Editor::execute`] runs the forward application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecuteMode {
    #[default]
    Apply,
    /// The caller already changed the state (live drawing); only record it.
    AlreadyApplied,
}

/// Editor state plus its undo history. All undoable edits go through here.
#[derive(Debug, Default)]
pub struct Editor {
    state: EditorState,
    history: History,
}

impl Editor {
    pub fn new(state: EditorState, history_limit: usize) -> Self {
        Self {
            state,
            history: History::new(history_limit),
        }
    }

    /// A blank editor sized and configured from preferences.
    pub fn from_preferences(prefs: &EditorPreferences) -> crate::Result<Self> {
        let mut state =
            EditorState::blank(prefs.default_width, prefs.default_height, prefs.palette_length)?;
        state.update_view(|v| ViewSettings {
            zoom: prefs.default_zoom,
            cycle_animation_enabled: prefs.cycle_animation,
            ..v
        });
        Ok(Self::new(state, prefs.history_limit))
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Direct access for non-undoable changes (live drawing, picking,
    /// cycling, view changes).
    pub fn state_mut(&mut self) -> &mut EditorState {
        &mut self.state
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn set_history_limit(&mut self, limit: usize) {
        self.history.set_limit(limit);
    }

    /// Run (unless already applied) and record a command. Clears redo.
    pub fn execute<C: Command + 'static>(&mut self, mut command: C, mode: ExecuteMode) -> CommandMeta {
        if mode == ExecuteMode::Apply {
            command.apply(&mut self.state);
        }
        let meta = command.meta().clone();
        debug!("Executed {} ({})", meta.label, meta.id);
        self.history.push(Box::new(command));
        meta
    }

    /// Revert the newest command. `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<CommandMeta> {
        let mut command = self.history.pop_undo()?;
        command.revert(&mut self.state);
        let meta = command.meta().clone();
        debug!("Undo {} ({})", meta.label, meta.id);
        self.history.push_redo(command);
        Some(meta)
    }

    /// Re-apply the newest undone command. `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Option<CommandMeta> {
        let mut command = self.history.pop_redo()?;
        command.apply(&mut self.state);
        let meta = command.meta().clone();
        debug!("Redo {} ({})", meta.label, meta.id);
        self.history.push_undo(command);
        Some(meta)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.history.undo_label()
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.history.redo_label()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::ClearCommand;

    fn small_editor(limit: usize) -> Editor {
        Editor::new(EditorState::blank(4, 4, 8).unwrap(), limit)
    }

    #[test]
    fn empty_history_returns_none() {
        let mut editor = small_editor(10);
        assert!(editor.undo().is_none());
        assert!(editor.redo().is_none());
        assert!(!editor.can_undo());
        assert!(!editor.can_redo());
    }

    #[test]
    fn execute_undo_redo_cycle() {
        let mut editor = small_editor(10);
        let before = editor.state().snapshot();
        let cmd = ClearCommand::new(editor.state(), 3);
        let meta = editor.execute(cmd, ExecuteMode::Apply);
        assert_eq!(editor.state().document().sample(0, 0), Some(3));
        assert_eq!(editor.undo_label(), Some("Clear"));

        let undone = editor.undo().unwrap();
        assert_eq!(undone.id, meta.id);
        assert_eq!(editor.state().snapshot(), before);
        assert_eq!(editor.redo_label(), Some("Clear"));

        let redone = editor.redo().unwrap();
        assert_eq!(redone.id, meta.id);
        assert_eq!(editor.state().document().sample(3, 3), Some(3));
    }

    #[test]
    fn new_command_drops_redo() {
        let mut editor = small_editor(10);
        let cmd = ClearCommand::new(editor.state(), 1);
        editor.execute(cmd, ExecuteMode::Apply);
        editor.undo();
        assert!(editor.can_redo());
        let cmd = ClearCommand::new(editor.state(), 2);
        editor.execute(cmd, ExecuteMode::Apply);
        assert!(!editor.can_redo());
    }

    #[test]
    fn history_limit_evicts_oldest() {
        let mut editor = small_editor(3);
        for value in 1..=5 {
            let cmd = ClearCommand::new(editor.state(), value);
            editor.execute(cmd, ExecuteMode::Apply);
        }
        assert_eq!(editor.history().undo_count(), 3);
        while editor.undo().is_some() {}
        // Only the last three clears could be reverted.
        assert_eq!(editor.state().document().sample(0, 0), Some(2));
    }

    #[test]
    fn already_applied_skips_forward() {
        let mut editor = small_editor(10);
        let cmd = ClearCommand::new(editor.state(), 6);
        editor.execute(cmd, ExecuteMode::AlreadyApplied);
        assert_eq!(editor.state().document().sample(0, 0), Some(0));
        assert!(editor.can_undo());
    }

    #[test]
    fn clear_history_empties_both_stacks() {
        let mut editor = small_editor(10);
        let cmd = ClearCommand::new(editor.state(), 1);
        editor.execute(cmd, ExecuteMode::Apply);
        let cmd = ClearCommand::new(editor.state(), 2);
        editor.execute(cmd, ExecuteMode::Apply);
        editor.undo();
        editor.clear_history();
        assert!(!editor.can_undo());
        assert!(!editor.can_redo());
    }
}
