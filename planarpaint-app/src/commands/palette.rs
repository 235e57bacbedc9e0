use planarpaint_core::{CycleRange, EditorState, Palette, PaletteColor};
use tracing::debug;

use crate::command::{Command, CommandMeta};

/// One palette edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteOp {
    Update { index: usize, color: PaletteColor },
    Insert { index: usize, color: PaletteColor },
    Remove { index: usize },
    SetCycles(Vec<CycleRange>),
    /// Select foreground and background together.
    SelectIndices { foreground: usize, background: usize },
}

impl PaletteOp {
    fn apply(&self, state: &mut EditorState) {
        match self {
            Self::Update { index, color } => state.update_palette_color(*index, *color),
            Self::Insert { index, color } => state.insert_palette_color(*index, *color),
            Self::Remove { index } => state.remove_palette_color(*index),
            Self::SetCycles(cycles) => state.set_palette_cycles(cycles.clone()),
            Self::SelectIndices {
                foreground,
                background,
            } => {
                state.set_foreground_index(*foreground);
                state.set_background_index(*background);
            }
        }
    }

    /// The ops that undo `self`, computed against the palette as it is
    /// immediately before `self` runs. Applied in order.
    fn inverse(&self, palette: &Palette) -> Vec<PaletteOp> {
        let selection = Self::SelectIndices {
            foreground: palette.foreground(),
            background: palette.background(),
        };
        let last = palette.len() - 1;
        match self {
            Self::Update { index, .. } => {
                let index = (*index).min(last);
                let color = palette.color(index).unwrap_or(PaletteColor::BLACK);
                vec![Self::Update { index, color }]
            }
            Self::Insert { index, .. } => {
                if palette.len() >= planarpaint_core::palette::MAX_PALETTE_SIZE {
                    return Vec::new();
                }
                vec![
                    Self::Remove {
                        index: (*index).min(palette.len()),
                    },
                    selection,
                ]
            }
            Self::Remove { index } => {
                if palette.len() <= planarpaint_core::palette::MIN_PALETTE_SIZE {
                    return Vec::new();
                }
                let index = (*index).min(last);
                let color = palette.color(index).unwrap_or(PaletteColor::BLACK);
                vec![Self::Insert { index, color }, selection]
            }
            Self::SetCycles(_) => vec![Self::SetCycles(palette.cycles().to_vec())],
            Self::SelectIndices { .. } => vec![selection],
        }
    }
}

/// Two-phase state: inverses exist only after the first forward run.
#[derive(Debug)]
enum Phase {
    Pending,
    Applied { inverses: Vec<Vec<PaletteOp>> },
}

/// A batch of palette edits applied as one undoable step.
///
/// Each op's inverse is computed lazily on the first `apply`, against the
/// palette just before that op, so later ops in the batch see the effect of
/// earlier ones. Undo runs the inverses in reverse order.
#[derive(Debug)]
pub struct PaletteChangeCommand {
    meta: CommandMeta,
    ops: Vec<PaletteOp>,
    phase: Phase,
}

impl PaletteChangeCommand {
    pub fn new(ops: Vec<PaletteOp>) -> Self {
        Self::with_label(ops, "Palette change")
    }

    pub fn with_label(ops: Vec<PaletteOp>, label: impl Into<String>) -> Self {
        Self {
            meta: CommandMeta::new("palette", label),
            ops,
            phase: Phase::Pending,
        }
    }

    pub fn ops(&self) -> &[PaletteOp] {
        &self.ops
    }

    pub fn is_applied(&self) -> bool {
        matches!(self.phase, Phase::Applied { .. })
    }
}

impl Command for PaletteChangeCommand {
    fn meta(&self) -> &CommandMeta {
        &self.meta
    }

    fn apply(&mut self, state: &mut EditorState) {
        match self.phase {
            Phase::Pending => {
                let mut inverses = Vec::with_capacity(self.ops.len());
                for op in &self.ops {
                    inverses.push(op.inverse(state.palette()));
                    op.apply(state);
                }
                self.phase = Phase::Applied { inverses };
            }
            Phase::Applied { .. } => {
                for op in &self.ops {
                    op.apply(state);
                }
            }
        }
    }

    fn revert(&mut self, state: &mut EditorState) {
        let Phase::Applied { inverses } = &self.phase else {
            debug!("Palette change {} reverted before apply", self.meta.id);
            return;
        };
        for group in inverses.iter().rev() {
            for op in group {
                op.apply(state);
            }
        }
    }
}
