use planarpaint_core::draw::LinePoints;
use planarpaint_core::{Document, EditorState, PixelSnapshot};

use super::restore_pixels;
use crate::command::{Command, CommandMeta};

/// A single-shot drawing operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Line {
        from: (i32, i32),
        to: (i32, i32),
    },
    Rectangle {
        from: (i32, i32),
        to: (i32, i32),
        filled: bool,
    },
    Fill {
        at: (i32, i32),
    },
}

impl Shape {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Line { .. } => "Line",
            Self::Rectangle { .. } => "Rectangle",
            Self::Fill { .. } => "Fill",
        }
    }

    fn id_prefix(&self) -> &'static str {
        match self {
            Self::Line { .. } => "line",
            Self::Rectangle { .. } => "rect",
            Self::Fill { .. } => "fill",
        }
    }

    /// Draw into a document.
    pub fn draw(&self, document: &mut Document, value: u32) {
        match *self {
            Self::Line { from, to } => {
                document.draw_line(from.0, from.1, to.0, to.1, value);
            }
            Self::Rectangle { from, to, filled } => {
                document.draw_rect(from.0, from.1, to.0, to.1, value, filled);
            }
            Self::Fill { at } => {
                document.flood_fill(at.0, at.1, value);
            }
        }
    }

    /// Points a preview would cover. Fills have no geometric preview.
    pub fn outline_points(&self) -> Vec<(i32, i32)> {
        match *self {
            Self::Line { from, to } => LinePoints::new(from.0, from.1, to.0, to.1).collect(),
            Self::Rectangle { from, to, filled } => {
                let (x0, y0, x1, y1) = (from.0, from.1, to.0, to.1);
                if filled {
                    let (min_x, max_x) = (x0.min(x1), x0.max(x1));
                    (y0.min(y1)..=y0.max(y1))
                        .flat_map(|y| LinePoints::new(min_x, y, max_x, y))
                        .collect()
                } else {
                    let mut points: Vec<(i32, i32)> = LinePoints::new(x0, y0, x1, y0)
                        .chain(LinePoints::new(x1, y0, x1, y1))
                        .chain(LinePoints::new(x1, y1, x0, y1))
                        .chain(LinePoints::new(x0, y1, x0, y0))
                        .collect();
                    points.sort_unstable();
                    points.dedup();
                    points
                }
            }
            Self::Fill { .. } => Vec::new(),
        }
    }
}

/// Line, rectangle, or flood fill as one undoable step.
#[derive(Debug)]
pub struct ShapeCommand {
    meta: CommandMeta,
    shape: Shape,
    value: u32,
    before: PixelSnapshot,
}

impl ShapeCommand {
    /// Snapshot the document now; the shape is drawn on `apply`.
    pub fn new(state: &EditorState, shape: Shape, value: u32) -> Self {
        Self {
            meta: CommandMeta::new(shape.id_prefix(), shape.label()),
            shape,
            value,
            before: state.document().snapshot(),
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }
}

impl Command for ShapeCommand {
    fn meta(&self) -> &CommandMeta {
        &self.meta
    }

    fn apply(&mut self, state: &mut EditorState) {
        let (shape, value) = (self.shape, self.value);
        state.edit_document(|doc| shape.draw(doc, value));
    }

    fn revert(&mut self, state: &mut EditorState) {
        restore_pixels(state, &self.before);
    }

    fn memory_size(&self) -> usize {
        self.before.memory_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_round_trips() {
        let mut state = EditorState::blank(5, 5, 8).unwrap();
        state.edit_document(|doc| doc.draw_line(2, 0, 2, 4, 1));
        let before = state.snapshot();
        let mut cmd = ShapeCommand::new(&state, Shape::Fill { at: (0, 0) }, 3);
        cmd.apply(&mut state);
        assert_eq!(state.document().sample(1, 4), Some(3));
        assert_eq!(state.document().sample(3, 0), Some(0));
        cmd.revert(&mut state);
        assert_eq!(state.snapshot(), before);
        cmd.apply(&mut state);
        assert_eq!(state.document().sample(0, 4), Some(3));
    }

    #[test]
    fn outline_points_for_rectangles() {
        let outline = Shape::Rectangle {
            from: (0, 0),
            to: (2, 2),
            filled: false,
        };
        assert_eq!(outline.outline_points().len(), 8);
        let filled = Shape::Rectangle {
            from: (2, 2),
            to: (0, 0),
            filled: true,
        };
        assert_eq!(filled.outline_points().len(), 9);
        assert!(Shape::Fill { at: (0, 0) }.outline_points().is_empty());
    }

    #[test]
    fn labels_follow_shape() {
        let state = EditorState::blank(2, 2, 2).unwrap();
        let cmd = ShapeCommand::new(
            &state,
            Shape::Line {
                from: (0, 0),
                to: (1, 1),
            },
            1,
        );
        assert_eq!(cmd.meta().label, "Line");
        assert!(cmd.meta().id.starts_with("line-"));
    }
}
