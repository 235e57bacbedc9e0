pub mod document;
pub mod draw;
pub mod error;
pub mod palette;
pub mod state;
pub mod view;

// Re-export primary types for convenience.
pub use document::{Canvas, DirectImage, Document, ImageMode, IndexedImage, PixelSnapshot};
pub use draw::LinePoints;
pub use error::CoreError;
pub use palette::{CycleRange, Palette, PaletteColor};
pub use state::{EditorState, StateSnapshot, ToolKind, ToolSettings};
pub use view::ViewSettings;

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
