//! Pointer tools: translate press/move/release into live edits and commands.

use planarpaint_core::{Document, PaletteColor, ToolKind};

use crate::commands::{Shape, ShapeCommand, StrokeCommand};
use crate::editor::{Editor, ExecuteMode};

// ---------------------------------------------------------------------------
// Pointer input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    /// Draws with the foreground entry.
    #[default]
    Primary,
    /// Draws with the background entry.
    Secondary,
}

/// A pointer event in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub x: i32,
    pub y: i32,
    pub button: PointerButton,
}

impl PointerEvent {
    pub fn primary(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            button: PointerButton::Primary,
        }
    }

    pub fn secondary(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            button: PointerButton::Secondary,
        }
    }
}

// ---------------------------------------------------------------------------
// Preview overlay
// ---------------------------------------------------------------------------

/// The in-progress shape a renderer draws over the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overlay {
    preview: Option<(Shape, u32)>,
}

impl Overlay {
    pub fn set(&mut self, shape: Shape, value: u32) {
        self.preview = Some((shape, value));
    }

    pub fn clear(&mut self) {
        self.preview = None;
    }

    pub fn is_empty(&self) -> bool {
        self.preview.is_none()
    }

    pub fn shape(&self) -> Option<Shape> {
        self.preview.map(|(shape, _)| shape)
    }

    /// The pixel value the preview is drawn with.
    pub fn value(&self) -> Option<u32> {
        self.preview.map(|(_, value)| value)
    }

    /// Document pixels covered by the preview.
    pub fn points(&self) -> Vec<(i32, i32)> {
        self.preview
            .map(|(shape, _)| shape.outline_points())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Tool trait
// ---------------------------------------------------------------------------

/// What a tool may touch while handling an event.
pub struct ToolContext<'a> {
    pub editor: &'a mut Editor,
    pub overlay: &'a mut Overlay,
}

impl<'a> ToolContext<'a> {
    pub fn new(editor: &'a mut Editor, overlay: &'a mut Overlay) -> Self {
        Self { editor, overlay }
    }

    /// Pixel value for the palette entry bound to `button`.
    fn draw_value(&self, button: PointerButton) -> u32 {
        let state = self.editor.state();
        let palette = state.palette();
        let index = match button {
            PointerButton::Primary => palette.foreground(),
            PointerButton::Secondary => palette.background(),
        };
        state.draw_value(index)
    }
}

pub trait Tool {
    fn kind(&self) -> ToolKind;
    fn pointer_down(&mut self, ctx: &mut ToolContext<'_>, event: PointerEvent);
    fn pointer_move(&mut self, _ctx: &mut ToolContext<'_>, _event: PointerEvent) {}
    fn pointer_up(&mut self, _ctx: &mut ToolContext<'_>, _event: PointerEvent) {}
    /// Abandon the gesture in progress without recording anything.
    fn cancel(&mut self, ctx: &mut ToolContext<'_>) {
        ctx.overlay.clear();
    }
}

/// Build the tool for a [`ToolKind`].
pub trait CreateTool {
    fn create(self) -> Box<dyn Tool>;
}

impl CreateTool for ToolKind {
    fn create(self) -> Box<dyn Tool> {
        match self {
            ToolKind::Pencil => Box::<PencilTool>::default(),
            ToolKind::Line => Box::<LineTool>::default(),
            ToolKind::Rectangle => Box::<RectangleTool>::default(),
            ToolKind::Fill => Box::new(FillTool),
            ToolKind::Picker => Box::new(PickerTool),
        }
    }
}

// ---------------------------------------------------------------------------
// Pencil
// ---------------------------------------------------------------------------

/// Freehand drawing. Pixels change live; release records one stroke.
#[derive(Debug, Default)]
pub struct PencilTool {
    stroke: Option<StrokeCommand>,
}

impl PencilTool {
    pub fn is_drawing(&self) -> bool {
        self.stroke.is_some()
    }

    /// Record the stroke in progress, if any. Its pixels are already live.
    fn commit(&mut self, ctx: &mut ToolContext<'_>) {
        if let Some(mut stroke) = self.stroke.take() {
            stroke.capture_after(ctx.editor.state());
            ctx.editor.execute(stroke, ExecuteMode::AlreadyApplied);
        }
    }
}

impl Tool for PencilTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Pencil
    }

    fn pointer_down(&mut self, ctx: &mut ToolContext<'_>, event: PointerEvent) {
        // A press without a release for the previous stroke.
        self.commit(ctx);
        let value = ctx.draw_value(event.button);
        let mut stroke = StrokeCommand::new(ctx.editor.state(), value);
        stroke.add_point(event.x, event.y);
        ctx.editor
            .state_mut()
            .edit_document(|doc| doc.draw_line(event.x, event.y, event.x, event.y, value));
        self.stroke = Some(stroke);
    }

    fn pointer_move(&mut self, ctx: &mut ToolContext<'_>, event: PointerEvent) {
        let Some(stroke) = self.stroke.as_mut() else {
            return;
        };
        let Some((lx, ly)) = stroke.last_point() else {
            return;
        };
        let value = stroke.value();
        ctx.editor
            .state_mut()
            .edit_document(|doc| doc.draw_line(lx, ly, event.x, event.y, value));
        stroke.add_point(event.x, event.y);
    }

    fn pointer_up(&mut self, ctx: &mut ToolContext<'_>, event: PointerEvent) {
        let Some(stroke) = self.stroke.as_mut() else {
            return;
        };
        if stroke.last_point() != Some((event.x, event.y)) {
            if let Some((lx, ly)) = stroke.last_point() {
                let value = stroke.value();
                ctx.editor
                    .state_mut()
                    .edit_document(|doc| doc.draw_line(lx, ly, event.x, event.y, value));
            }
            stroke.add_point(event.x, event.y);
        }
        self.commit(ctx);
    }

    fn cancel(&mut self, ctx: &mut ToolContext<'_>) {
        if let Some(stroke) = self.stroke.take() {
            crate::commands::restore_pixels(ctx.editor.state_mut(), stroke.before());
        }
        ctx.overlay.clear();
    }
}

// ---------------------------------------------------------------------------
// Line and rectangle
// ---------------------------------------------------------------------------

/// Anchor and value of a two-point drag.
#[derive(Debug, Clone, Copy)]
struct Drag {
    from: (i32, i32),
    value: u32,
}

/// Straight line from press to release, previewed in the overlay.
#[derive(Debug, Default)]
pub struct LineTool {
    drag: Option<Drag>,
}

impl Tool for LineTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Line
    }

    fn pointer_down(&mut self, ctx: &mut ToolContext<'_>, event: PointerEvent) {
        let drag = Drag {
            from: (event.x, event.y),
            value: ctx.draw_value(event.button),
        };
        ctx.overlay.set(
            Shape::Line {
                from: drag.from,
                to: drag.from,
            },
            drag.value,
        );
        self.drag = Some(drag);
    }

    fn pointer_move(&mut self, ctx: &mut ToolContext<'_>, event: PointerEvent) {
        if let Some(drag) = self.drag {
            let to = (event.x, event.y);
            ctx.overlay.set(Shape::Line { from: drag.from, to }, drag.value);
        }
    }

    fn pointer_up(&mut self, ctx: &mut ToolContext<'_>, event: PointerEvent) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        ctx.overlay.clear();
        let shape = Shape::Line {
            from: drag.from,
            to: (event.x, event.y),
        };
        let command = ShapeCommand::new(ctx.editor.state(), shape, drag.value);
        ctx.editor.execute(command, ExecuteMode::Apply);
    }

    fn cancel(&mut self, ctx: &mut ToolContext<'_>) {
        self.drag = None;
        ctx.overlay.clear();
    }
}

/// Axis-aligned rectangle between press and release. Filled or outlined
/// according to the tool settings at press time.
#[derive(Debug, Default)]
pub struct RectangleTool {
    drag: Option<(Drag, bool)>,
}

impl Tool for RectangleTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Rectangle
    }

    fn pointer_down(&mut self, ctx: &mut ToolContext<'_>, event: PointerEvent) {
        let drag = Drag {
            from: (event.x, event.y),
            value: ctx.draw_value(event.button),
        };
        let filled = ctx.editor.state().tool.rectangle_filled;
        ctx.overlay.set(
            Shape::Rectangle {
                from: drag.from,
                to: drag.from,
                filled,
            },
            drag.value,
        );
        self.drag = Some((drag, filled));
    }

    fn pointer_move(&mut self, ctx: &mut ToolContext<'_>, event: PointerEvent) {
        if let Some((drag, filled)) = self.drag {
            let shape = Shape::Rectangle {
                from: drag.from,
                to: (event.x, event.y),
                filled,
            };
            ctx.overlay.set(shape, drag.value);
        }
    }

    fn pointer_up(&mut self, ctx: &mut ToolContext<'_>, event: PointerEvent) {
        let Some((drag, filled)) = self.drag.take() else {
            return;
        };
        ctx.overlay.clear();
        let shape = Shape::Rectangle {
            from: drag.from,
            to: (event.x, event.y),
            filled,
        };
        let command = ShapeCommand::new(ctx.editor.state(), shape, drag.value);
        ctx.editor.execute(command, ExecuteMode::Apply);
    }

    fn cancel(&mut self, ctx: &mut ToolContext<'_>) {
        self.drag = None;
        ctx.overlay.clear();
    }
}

// ---------------------------------------------------------------------------
// Fill and picker
// ---------------------------------------------------------------------------

/// Flood fill on press.
#[derive(Debug, Default, Clone, Copy)]
pub struct FillTool;

impl Tool for FillTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Fill
    }

    fn pointer_down(&mut self, ctx: &mut ToolContext<'_>, event: PointerEvent) {
        let value = ctx.draw_value(event.button);
        match ctx.editor.state().document().sample(event.x, event.y) {
            Some(current) if current != stored_value(ctx.editor.state().document(), value) => {}
            _ => return,
        }
        let shape = Shape::Fill {
            at: (event.x, event.y),
        };
        let command = ShapeCommand::new(ctx.editor.state(), shape, value);
        ctx.editor.execute(command, ExecuteMode::Apply);
    }
}

/// What a document actually stores for a draw value.
fn stored_value(document: &Document, value: u32) -> u32 {
    match document {
        Document::Indexed(_) => value & 0xff,
        Document::Direct(_) => value,
    }
}

/// Sample a pixel into the foreground (primary) or background (secondary)
/// selection. Not undoable.
#[derive(Debug, Default, Clone, Copy)]
pub struct PickerTool;

impl Tool for PickerTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Picker
    }

    fn pointer_down(&mut self, ctx: &mut ToolContext<'_>, event: PointerEvent) {
        let state = ctx.editor.state_mut();
        let Some(sampled) = state.document().sample(event.x, event.y) else {
            return;
        };
        let index = match state.document() {
            Document::Indexed(_) => sampled as usize,
            Document::Direct(_) => state.palette().nearest_index(PaletteColor::unpack(sampled)),
        };
        match event.button {
            PointerButton::Primary => state.set_foreground_index(index),
            PointerButton::Secondary => state.set_background_index(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planarpaint_core::EditorState;

    fn editor() -> Editor {
        Editor::new(EditorState::blank(8, 8, 16).unwrap(), 50)
    }

    #[test]
    fn create_builds_matching_kind() {
        for kind in ToolKind::ALL {
            assert_eq!(kind.create().kind(), kind);
        }
    }

    #[test]
    fn pencil_stroke_is_one_command() {
        let mut editor = editor();
        let mut overlay = Overlay::default();
        let mut ctx = ToolContext::new(&mut editor, &mut overlay);
        let mut pencil = PencilTool::default();
        pencil.pointer_down(&mut ctx, PointerEvent::primary(0, 0));
        assert_eq!(ctx.editor.state().document().sample(0, 0), Some(1));
        pencil.pointer_move(&mut ctx, PointerEvent::primary(3, 0));
        pencil.pointer_move(&mut ctx, PointerEvent::primary(3, 3));
        pencil.pointer_up(&mut ctx, PointerEvent::primary(3, 3));
        assert!(!pencil.is_drawing());
        assert_eq!(ctx.editor.history().undo_count(), 1);
        assert_eq!(ctx.editor.state().document().sample(3, 2), Some(1));

        ctx.editor.undo();
        assert_eq!(ctx.editor.state().document().sample(3, 2), Some(0));
        ctx.editor.redo();
        assert_eq!(ctx.editor.state().document().sample(2, 0), Some(1));
    }

    #[test]
    fn pencil_cancel_restores_and_records_nothing() {
        let mut editor = editor();
        let mut overlay = Overlay::default();
        let mut ctx = ToolContext::new(&mut editor, &mut overlay);
        let mut pencil = PencilTool::default();
        pencil.pointer_down(&mut ctx, PointerEvent::primary(1, 1));
        pencil.pointer_move(&mut ctx, PointerEvent::primary(5, 5));
        assert_eq!(ctx.editor.state().document().sample(5, 5), Some(1));
        pencil.cancel(&mut ctx);
        pencil.pointer_up(&mut ctx, PointerEvent::primary(5, 5));
        assert!(!ctx.editor.can_undo());
        assert_eq!(ctx.editor.state().document().sample(5, 5), Some(0));
    }

    #[test]
    fn press_without_release_records_previous_stroke() {
        let mut editor = editor();
        let mut overlay = Overlay::default();
        let mut ctx = ToolContext::new(&mut editor, &mut overlay);
        let mut pencil = PencilTool::default();
        pencil.pointer_down(&mut ctx, PointerEvent::primary(0, 0));
        pencil.pointer_move(&mut ctx, PointerEvent::primary(3, 0));
        pencil.pointer_down(&mut ctx, PointerEvent::primary(6, 6));
        pencil.pointer_up(&mut ctx, PointerEvent::primary(6, 6));
        assert_eq!(ctx.editor.history().undo_count(), 2);

        while ctx.editor.undo().is_some() {}
        assert_eq!(ctx.editor.state().document().sample(3, 0), Some(0));
        assert_eq!(ctx.editor.state().document().sample(6, 6), Some(0));
    }

    #[test]
    fn line_previews_then_commits() {
        let mut editor = editor();
        let mut overlay = Overlay::default();
        let mut line = LineTool::default();
        {
            let mut ctx = ToolContext::new(&mut editor, &mut overlay);
            line.pointer_down(&mut ctx, PointerEvent::primary(0, 0));
            line.pointer_move(&mut ctx, PointerEvent::primary(4, 0));
        }
        assert_eq!(overlay.points().len(), 5);
        assert_eq!(overlay.value(), Some(1));
        assert_eq!(editor.state().document().sample(2, 0), Some(0));
        {
            let mut ctx = ToolContext::new(&mut editor, &mut overlay);
            line.pointer_up(&mut ctx, PointerEvent::primary(4, 2));
        }
        assert!(overlay.is_empty());
        assert_eq!(editor.state().document().sample(4, 2), Some(1));
        assert_eq!(editor.undo_label(), Some("Line"));
    }

    #[test]
    fn rectangle_cancel_clears_overlay() {
        let mut editor = editor();
        editor.state_mut().tool.rectangle_filled = true;
        let mut overlay = Overlay::default();
        let mut rect = RectangleTool::default();
        let mut ctx = ToolContext::new(&mut editor, &mut overlay);
        rect.pointer_down(&mut ctx, PointerEvent::primary(1, 1));
        rect.pointer_move(&mut ctx, PointerEvent::primary(3, 3));
        assert_eq!(ctx.overlay.points().len(), 9);
        rect.cancel(&mut ctx);
        rect.pointer_up(&mut ctx, PointerEvent::primary(3, 3));
        assert!(ctx.overlay.is_empty());
        assert!(!ctx.editor.can_undo());
    }

    #[test]
    fn fill_uses_background_on_secondary() {
        let mut editor = editor();
        editor.state_mut().set_background_index(7);
        let mut overlay = Overlay::default();
        let mut ctx = ToolContext::new(&mut editor, &mut overlay);
        FillTool.pointer_down(&mut ctx, PointerEvent::secondary(2, 2));
        assert_eq!(ctx.editor.state().document().sample(7, 7), Some(7));
        assert_eq!(ctx.editor.undo_label(), Some("Fill"));
    }

    #[test]
    fn fill_without_effect_records_nothing() {
        let mut editor = editor();
        editor.state_mut().set_foreground_index(0);
        let mut overlay = Overlay::default();
        let mut ctx = ToolContext::new(&mut editor, &mut overlay);
        FillTool.pointer_down(&mut ctx, PointerEvent::primary(2, 2));
        FillTool.pointer_down(&mut ctx, PointerEvent::primary(-1, 2));
        FillTool.pointer_down(&mut ctx, PointerEvent::secondary(8, 0));
        assert!(!ctx.editor.can_undo());
    }

    #[test]
    fn picker_sets_selection_without_history() {
        let mut editor = editor();
        editor
            .state_mut()
            .edit_document(|doc| doc.draw_line(0, 0, 0, 0, 9));
        let mut overlay = Overlay::default();
        let mut ctx = ToolContext::new(&mut editor, &mut overlay);
        PickerTool.pointer_down(&mut ctx, PointerEvent::primary(0, 0));
        PickerTool.pointer_down(&mut ctx, PointerEvent::secondary(1, 0));
        PickerTool.pointer_down(&mut ctx, PointerEvent::primary(100, 0));
        assert_eq!(ctx.editor.state().palette().foreground(), 9);
        assert_eq!(ctx.editor.state().palette().background(), 0);
        assert!(!ctx.editor.can_undo());
    }

    #[test]
    fn picker_on_direct_document_picks_nearest_entry() {
        let mut editor = editor();
        let red = PaletteColor::opaque(250, 4, 4).pack();
        let doc = planarpaint_core::DirectImage::from_pixels(1, 1, vec![red]).unwrap();
        editor.state_mut().set_document(Document::Direct(doc));
        let mut overlay = Overlay::default();
        let mut ctx = ToolContext::new(&mut editor, &mut overlay);
        PickerTool.pointer_down(&mut ctx, PointerEvent::primary(0, 0));
        assert_eq!(ctx.editor.state().palette().foreground(), 11);
    }
}
