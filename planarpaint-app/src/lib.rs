//! Editing engine for PlanarPaint: commands with undo/redo, pointer tools,
//! project snapshots, ILBM import, and palette cycling.

pub mod command;
pub mod commands;
pub mod cycler;
pub mod editor;
pub mod error;
pub mod history;
pub mod import;
pub mod preferences;
pub mod project;
pub mod tools;

pub use command::{Command, CommandMeta};
pub use commands::{
    ClearCommand, PaletteChangeCommand, PaletteOp, ReplaceStateCommand, Shape, ShapeCommand,
    StrokeCommand,
};
pub use cycler::PaletteCycler;
pub use editor::{Editor, ExecuteMode};
pub use error::{AppError, ProjectError};
pub use history::{History, DEFAULT_HISTORY_LIMIT};
pub use import::{import_ilbm_bytes, import_ilbm_file};
pub use preferences::EditorPreferences;
pub use project::{
    load_project, load_project_json, project_to_json, save_project, ProjectFile, PROJECT_VERSION,
};
pub use tools::{CreateTool, Overlay, PointerButton, PointerEvent, Tool, ToolContext};

/// Convenience result type for the editing engine.
pub type Result<T> = std::result::Result<T, AppError>;
