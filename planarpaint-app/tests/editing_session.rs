use std::time::Duration;

use planarpaint_app::{
    import_ilbm_bytes, load_project_json, project_to_json, AppError, CreateTool, Editor,
    ExecuteMode, Overlay, PaletteChangeCommand, PaletteCycler, PaletteOp, PointerEvent,
    ToolContext,
};
use planarpaint_core::{Canvas, PaletteColor, ToolKind, ViewSettings};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn chunk(id: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut out = id.to_vec();
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(data);
    if data.len() % 2 == 1 {
        out.push(0);
    }
    out
}

/// A 4x2, two-plane, uncompressed ILBM holding indices 0..=3 then 3..=0,
/// with a four-color CMAP and one active CRNG over entries 1..=3.
fn sample_ilbm() -> Vec<u8> {
    let mut bmhd = vec![0u8; 20];
    bmhd[0..2].copy_from_slice(&4u16.to_be_bytes());
    bmhd[2..4].copy_from_slice(&2u16.to_be_bytes());
    bmhd[8] = 2;

    // Row 0: 0 1 2 3 -> plane0 0101, plane1 0011
    // Row 1: 3 2 1 0 -> plane0 1010, plane1 1100
    let body = [
        0b0101_0000, 0, 0b0011_0000, 0, //
        0b1010_0000, 0, 0b1100_0000, 0,
    ];
    let cmap = [0, 0, 0, 255, 0, 0, 0, 255, 0, 0, 0, 255];
    let crng = [0, 12, 1, 3, 1, 0, 0, 0];

    let payload = [
        chunk(b"BMHD", &bmhd),
        chunk(b"CMAP", &cmap),
        chunk(b"CRNG", &crng),
        chunk(b"BODY", &body),
    ]
    .concat();
    let mut out = b"FORM".to_vec();
    out.extend_from_slice(&(payload.len() as u32 + 4).to_be_bytes());
    out.extend_from_slice(b"ILBM");
    out.extend_from_slice(&payload);
    out
}

fn drag(editor: &mut Editor, kind: ToolKind, from: (i32, i32), to: (i32, i32)) {
    let mut overlay = Overlay::default();
    let mut tool = kind.create();
    let mut ctx = ToolContext::new(editor, &mut overlay);
    tool.pointer_down(&mut ctx, PointerEvent::primary(from.0, from.1));
    tool.pointer_move(&mut ctx, PointerEvent::primary(to.0, to.1));
    tool.pointer_up(&mut ctx, PointerEvent::primary(to.0, to.1));
    assert!(overlay.is_empty());
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn tool_session_undoes_and_redoes_in_order() {
    let mut editor = Editor::default();
    let blank = editor.state().snapshot();

    drag(&mut editor, ToolKind::Pencil, (1, 1), (4, 1));
    let after_pencil = editor.state().snapshot();
    for x in 1..=4 {
        assert_eq!(editor.state().document().sample(x, 1), Some(1));
    }

    drag(&mut editor, ToolKind::Rectangle, (10, 10), (12, 12));
    assert_eq!(editor.state().document().sample(10, 12), Some(1));
    assert_eq!(editor.state().document().sample(11, 11), Some(0));
    assert_eq!(editor.undo_label(), Some("Rectangle"));

    assert!(editor.undo().is_some());
    assert_eq!(editor.state().snapshot(), after_pencil);
    assert!(editor.undo().is_some());
    assert_eq!(editor.state().snapshot(), blank);
    assert!(editor.undo().is_none());

    assert!(editor.redo().is_some());
    assert_eq!(editor.state().snapshot(), after_pencil);
}

#[test]
fn palette_change_is_exactly_reversible() {
    let mut editor = Editor::default();
    let before = editor.state().snapshot();
    editor.execute(
        PaletteChangeCommand::new(vec![
            PaletteOp::Update {
                index: 3,
                color: PaletteColor::opaque(1, 2, 3),
            },
            PaletteOp::Remove { index: 0 },
        ]),
        ExecuteMode::Apply,
    );
    assert_eq!(editor.state().palette().len(), 31);
    assert_eq!(
        editor.state().document().as_indexed().unwrap().palette(),
        editor.state().palette().colors()
    );

    editor.undo();
    assert_eq!(editor.state().snapshot(), before);
}

#[test]
fn import_replaces_state_and_undoes() {
    let mut editor = Editor::default();
    editor.state_mut().update_view(|v| ViewSettings {
        zoom: 8,
        offset_x: 5,
        offset_y: 7,
        ..v
    });
    editor.state_mut().set_foreground_index(20);
    let before = editor.state().snapshot();

    let meta = import_ilbm_bytes(&mut editor, &sample_ilbm()).unwrap();
    assert_eq!(meta.label, "Import ILBM");

    let state = editor.state();
    let img = state.document().as_indexed().unwrap();
    assert_eq!((img.width(), img.height()), (4, 2));
    assert_eq!(img.pixels(), &[0, 1, 2, 3, 3, 2, 1, 0]);
    assert_eq!(state.palette().len(), 4);
    assert_eq!(state.palette().color(1), Some(PaletteColor::opaque(255, 0, 0)));
    assert_eq!(state.palette().foreground(), 1);
    assert_eq!(state.palette().background(), 0);
    assert_eq!(state.palette().cycles().len(), 1);
    assert_eq!(state.view().zoom, 8);
    assert_eq!((state.view().offset_x, state.view().offset_y), (0, 0));

    editor.undo();
    assert_eq!(editor.state().snapshot(), before);
}

#[test]
fn failed_import_reports_and_keeps_state() {
    let mut editor = Editor::default();
    let mut bytes = sample_ilbm();
    bytes.truncate(30);
    let before = editor.state().snapshot();
    let err = import_ilbm_bytes(&mut editor, &bytes).unwrap_err();
    assert!(matches!(err, AppError::Import(_)));
    assert_eq!(editor.state().snapshot(), before);
}

#[test]
fn imported_cycles_animate() {
    let mut editor = Editor::default();
    import_ilbm_bytes(&mut editor, &sample_ilbm()).unwrap();
    editor.state_mut().update_view(|v| ViewSettings {
        cycle_animation_enabled: true,
        ..v
    });
    let before = editor.state().palette().colors().to_vec();

    let mut cycler = PaletteCycler::new();
    assert!(cycler.advance(editor.state_mut(), Duration::from_millis(100)));

    let after = editor.state().palette().colors();
    assert_eq!(after[0], before[0]);
    assert_ne!(after[1..], before[1..]);
    let mut sorted_before = before[1..].to_vec();
    let mut sorted_after = after[1..].to_vec();
    sorted_before.sort_by_key(|c| c.pack());
    sorted_after.sort_by_key(|c| c.pack());
    assert_eq!(sorted_before, sorted_after);
}

#[test]
fn project_round_trip_after_import() {
    let mut editor = Editor::default();
    import_ilbm_bytes(&mut editor, &sample_ilbm()).unwrap();
    drag(&mut editor, ToolKind::Line, (0, 0), (3, 1));
    let json = project_to_json(editor.state()).unwrap();

    let mut other = Editor::default();
    load_project_json(&mut other, &json).unwrap();
    assert_eq!(other.state().snapshot(), editor.state().snapshot());
    assert_eq!(other.undo_label(), Some("Load project"));
}
