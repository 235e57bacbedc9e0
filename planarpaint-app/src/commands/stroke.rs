use planarpaint_core::{EditorState, PixelSnapshot};

use super::restore_pixels;
use crate::command::{Command, CommandMeta};

/// A freehand pencil stroke: every point of one press-drag-release gesture.
///
/// The tool draws live and records points; once the gesture ends the
/// resulting pixels are captured so redo is an exact copy rather than a
/// replay.
#[derive(Debug)]
pub struct StrokeCommand {
    meta: CommandMeta,
    value: u32,
    points: Vec<(i32, i32)>,
    before: PixelSnapshot,
    after: Option<PixelSnapshot>,
}

impl StrokeCommand {
    /// Start a stroke, snapshotting the document as it is now.
    pub fn new(state: &EditorState, value: u32) -> Self {
        Self {
            meta: CommandMeta::new("pencil", "Pencil stroke"),
            value,
            points: Vec::new(),
            before: state.document().snapshot(),
            after: None,
        }
    }

    pub fn add_point(&mut self, x: i32, y: i32) {
        self.points.push((x, y));
    }

    pub fn points(&self) -> &[(i32, i32)] {
        &self.points
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn last_point(&self) -> Option<(i32, i32)> {
        self.points.last().copied()
    }

    /// Store the document's pixels as the stroke's final result.
    pub fn capture_after(&mut self, state: &EditorState) {
        self.after = Some(state.document().snapshot());
    }

    pub(crate) fn before(&self) -> &PixelSnapshot {
        &self.before
    }

    fn replay(&self, state: &mut EditorState) {
        let Some(&(x0, y0)) = self.points.first() else {
            return;
        };
        let value = self.value;
        state.edit_document(|doc| {
            doc.draw_line(x0, y0, x0, y0, value);
            for pair in self.points.windows(2) {
                let ((ax, ay), (bx, by)) = (pair[0], pair[1]);
                doc.draw_line(ax, ay, bx, by, value);
            }
        });
    }
}

impl Command for StrokeCommand {
    fn meta(&self) -> &CommandMeta {
        &self.meta
    }

    fn apply(&mut self, state: &mut EditorState) {
        match &self.after {
            Some(after) => restore_pixels(state, after),
            None => self.replay(state),
        }
    }

    fn revert(&mut self, state: &mut EditorState) {
        restore_pixels(state, &self.before);
    }

    fn memory_size(&self) -> usize {
        self.before.memory_size()
            + self.after.as_ref().map_or(0, PixelSnapshot::memory_size)
            + self.points.len() * std::mem::size_of::<(i32, i32)>()
    }
}
