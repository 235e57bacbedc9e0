use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::document::Document;
use crate::palette::{CycleRange, Palette, PaletteColor};
use crate::view::ViewSettings;

// ---------------------------------------------------------------------------
// Tool settings
// ---------------------------------------------------------------------------

/// The pointer tools the editor offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Pencil,
    Line,
    Rectangle,
    Fill,
    Picker,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::Pencil,
        ToolKind::Line,
        ToolKind::Rectangle,
        ToolKind::Fill,
        ToolKind::Picker,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Pencil => "Pencil",
            Self::Line => "Line",
            Self::Rectangle => "Rectangle",
            Self::Fill => "Fill",
            Self::Picker => "Picker",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToolSettings {
    pub active: ToolKind,
    pub rectangle_filled: bool,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// A deep copy of everything a whole-state replacement swaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    pub document: Document,
    pub view: ViewSettings,
    pub palette: Palette,
}

// ---------------------------------------------------------------------------
// Editor state
// ---------------------------------------------------------------------------

/// The single owner of the document and palette.
///
/// The palette held here is the source of truth. After every palette
/// mutation and every document replacement, an indexed document's embedded
/// color table and cycle list are rewritten from it.
#[derive(Debug, Clone)]
pub struct EditorState {
    document: Document,
    palette: Palette,
    view: ViewSettings,
    pub tool: ToolSettings,
}

impl Default for EditorState {
    fn default() -> Self {
        let palette = Palette::default();
        let mut state = Self {
            document: Document::default(),
            palette,
            view: ViewSettings::default(),
            tool: ToolSettings::default(),
        };
        state.sync_document_palette();
        state
    }
}

impl EditorState {
    /// A blank indexed document of the given size with a default palette of
    /// `palette_length` entries.
    pub fn blank(width: u32, height: u32, palette_length: usize) -> crate::Result<Self> {
        let palette = Palette::with_length(palette_length);
        let document = Document::blank_indexed(width, height, &palette)?;
        let mut state = Self {
            document,
            palette,
            view: ViewSettings::default(),
            tool: ToolSettings::default(),
        };
        state.sync_document_palette();
        Ok(state)
    }

    /// Build a state from parts, with the same palette adoption rules as
    /// [`set_document`](Self::set_document).
    pub fn from_parts(document: Document, palette: Palette, view: ViewSettings) -> Self {
        let mut state = Self {
            document: Document::default(),
            palette,
            view: view.normalized(),
            tool: ToolSettings::default(),
        };
        state.set_document(document);
        state
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn view(&self) -> &ViewSettings {
        &self.view
    }

    /// Edit the document's pixels in place.
    ///
    /// The palette is re-synchronized afterwards, so the embedded color table
    /// cannot drift even if the closure touches more than pixels.
    pub fn edit_document<R>(&mut self, f: impl FnOnce(&mut Document) -> R) -> R {
        let result = f(&mut self.document);
        self.sync_document_palette();
        result
    }

    // -- document replacement ------------------------------------------------

    /// Replace the document.
    ///
    /// An indexed document's color table and cycles become the palette
    /// (sanitized), and the drawing indices are re-clamped to fit.
    pub fn set_document(&mut self, next: Document) {
        if let Document::Indexed(img) = &next {
            self.palette = Palette::new(
                img.palette().to_vec(),
                self.palette.foreground(),
                self.palette.background(),
                img.cycles().to_vec(),
            );
        }
        self.document = next;
        self.sync_document_palette();
        trace!(
            "Document replaced: {} {}x{}",
            self.document.mode().label(),
            self.document.width(),
            self.document.height()
        );
    }

    /// Replace the document with a pure transform of the current one.
    pub fn set_document_with(&mut self, updater: impl FnOnce(&Document) -> Document) {
        let next = updater(&self.document);
        self.set_document(next);
    }

    // -- palette ---------------------------------------------------------------

    pub fn set_palette_colors(&mut self, colors: Vec<PaletteColor>) {
        self.palette.set_colors(colors);
        self.sync_document_palette();
    }

    pub fn update_palette_color(&mut self, index: usize, color: PaletteColor) {
        self.palette.update_color(index, color);
        self.sync_document_palette();
    }

    pub fn insert_palette_color(&mut self, index: usize, color: PaletteColor) {
        self.palette.insert_color(index, color);
        self.sync_document_palette();
    }

    pub fn remove_palette_color(&mut self, index: usize) {
        self.palette.remove_color(index);
        self.sync_document_palette();
    }

    pub fn set_palette_cycles(&mut self, cycles: Vec<CycleRange>) {
        self.palette.set_cycles(cycles);
        self.sync_document_palette();
    }

    pub fn set_foreground_index(&mut self, index: usize) {
        self.palette.set_foreground(index);
        self.sync_document_palette();
    }

    pub fn set_background_index(&mut self, index: usize) {
        self.palette.set_background(index);
        self.sync_document_palette();
    }

    /// Rotate a palette range (color cycling). Returns whether anything moved.
    pub fn rotate_palette_range(&mut self, low: usize, high: usize, steps: i64) -> bool {
        let rotated = self.palette.rotate_range(low, high, steps);
        if rotated {
            self.sync_document_palette();
        }
        rotated
    }

    /// The pixel value that paints palette entry `index` into the current
    /// document: the index itself for indexed documents, the packed color
    /// for direct ones.
    pub fn draw_value(&self, index: usize) -> u32 {
        match &self.document {
            Document::Indexed(_) => index as u32,
            Document::Direct(_) => self
                .palette
                .color(index)
                .unwrap_or(PaletteColor::BLACK)
                .pack(),
        }
    }

    // -- view ------------------------------------------------------------------

    /// Replace the view with a transform of the current one. The zoom is
    /// normalized to a supported level.
    pub fn update_view(&mut self, updater: impl FnOnce(ViewSettings) -> ViewSettings) {
        self.view = updater(self.view).normalized();
    }

    // -- whole-state -----------------------------------------------------------

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            document: self.document.clone(),
            view: self.view,
            palette: self.palette.clone(),
        }
    }

    /// Swap in a full snapshot: document first, then view, then palette
    /// colors, cycles, and drawing indices.
    pub fn replace_all(&mut self, snapshot: &StateSnapshot) {
        self.set_document(snapshot.document.clone());
        self.update_view(|_| snapshot.view);
        self.set_palette_colors(snapshot.palette.colors().to_vec());
        self.set_palette_cycles(snapshot.palette.cycles().to_vec());
        self.set_foreground_index(snapshot.palette.foreground());
        self.set_background_index(snapshot.palette.background());
    }

    /// Rewrite the indexed document's color table and cycles from the palette.
    fn sync_document_palette(&mut self) {
        self.document.sync_palette(&self.palette);
    }
}
