//! JSON project snapshots: save and load the whole editor state.

use std::fs;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use tracing::info;

use planarpaint_core::{
    CycleRange, DirectImage, Document, EditorState, ImageMode, IndexedImage, Palette,
    PaletteColor, StateSnapshot, ViewSettings,
};

use crate::command::CommandMeta;
use crate::commands::ReplaceStateCommand;
use crate::editor::{Editor, ExecuteMode};
use crate::error::ProjectError;

pub const PROJECT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// File format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    pub version: u32,
    pub document: ProjectDocument,
    #[serde(default)]
    pub view: ViewSettings,
    pub palette: ProjectPalette,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDocument {
    pub mode: ImageMode,
    pub width: i64,
    pub height: i64,
    /// Base64 of the raw buffer: one byte per pixel for indexed documents,
    /// `r, g, b, a` per pixel for direct ones.
    pub pixels: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<Vec<PaletteColor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycles: Option<Vec<CycleRange>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPalette {
    #[serde(default)]
    pub foreground_index: i64,
    #[serde(default)]
    pub background_index: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<PaletteColor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycles: Option<Vec<CycleRange>>,
}

impl ProjectFile {
    pub fn from_state(state: &EditorState) -> Self {
        let document = state.document();
        let (palette, cycles) = match document {
            Document::Indexed(img) => (Some(img.palette().to_vec()), Some(img.cycles().to_vec())),
            Document::Direct(_) => (None, None),
        };
        let palette_state = state.palette();
        Self {
            version: PROJECT_VERSION,
            document: ProjectDocument {
                mode: document.mode(),
                width: i64::from(document.width()),
                height: i64::from(document.height()),
                pixels: BASE64.encode(document.pixel_bytes()),
                palette,
                cycles,
            },
            view: *state.view(),
            palette: ProjectPalette {
                foreground_index: palette_state.foreground() as i64,
                background_index: palette_state.background() as i64,
                colors: Some(palette_state.colors().to_vec()),
                cycles: Some(palette_state.cycles().to_vec()),
            },
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ProjectError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ProjectError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate and convert into a state snapshot. Nothing is mutated, so a
    /// failure here leaves the editor untouched.
    pub fn into_snapshot(self) -> Result<StateSnapshot, ProjectError> {
        if self.version != PROJECT_VERSION {
            return Err(ProjectError::UnsupportedVersion(self.version));
        }
        let doc = self.document;
        let (width, height) = match (u32::try_from(doc.width), u32::try_from(doc.height)) {
            (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
            _ => {
                return Err(ProjectError::InvalidDimensions {
                    width: doc.width,
                    height: doc.height,
                })
            }
        };
        let bytes = BASE64.decode(doc.pixels.as_bytes())?;
        let pixel_count = width as usize * height as usize;

        let document = match doc.mode {
            ImageMode::Indexed8 => {
                let colors = doc.palette.ok_or(ProjectError::MissingPalette)?;
                check_length("indexed", pixel_count, bytes.len())?;
                Document::Indexed(IndexedImage::from_pixels(
                    width,
                    height,
                    bytes,
                    colors,
                    doc.cycles.unwrap_or_default(),
                )?)
            }
            ImageMode::Rgba32 => {
                check_length("RGBA", pixel_count * 4, bytes.len())?;
                Document::Direct(DirectImage::from_rgba_bytes(width, height, &bytes)?)
            }
        };

        let (doc_colors, doc_cycles) = match &document {
            Document::Indexed(img) => (Some(img.palette().to_vec()), img.cycles().to_vec()),
            Document::Direct(_) => (None, Vec::new()),
        };
        let colors = self
            .palette
            .colors
            .or(doc_colors)
            .unwrap_or_else(|| Palette::default().colors().to_vec());
        let cycles = self.palette.cycles.unwrap_or(doc_cycles);
        let palette = Palette::new(
            colors,
            clamp_index(self.palette.foreground_index),
            clamp_index(self.palette.background_index),
            cycles,
        );

        Ok(StateSnapshot {
            document,
            view: self.view.normalized(),
            palette,
        })
    }
}

fn check_length(mode: &'static str, expected: usize, actual: usize) -> Result<(), ProjectError> {
    if expected != actual {
        return Err(ProjectError::PixelLengthMismatch {
            mode,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Negative indices become 0; the palette clamps the upper end.
fn clamp_index(index: i64) -> usize {
    usize::try_from(index.max(0)).unwrap_or(usize::MAX)
}

// ---------------------------------------------------------------------------
// Save / load
// ---------------------------------------------------------------------------

pub fn project_to_json(state: &EditorState) -> crate::Result<String> {
    Ok(ProjectFile::from_state(state).to_json()?)
}

pub fn save_project(state: &EditorState, path: &Path) -> crate::Result<()> {
    let json = project_to_json(state)?;
    fs::write(path, json)?;
    info!("Saved project to {}", path.display());
    Ok(())
}

/// Parse, validate, and load a project as one undoable step.
pub fn load_project_json(editor: &mut Editor, json: &str) -> crate::Result<CommandMeta> {
    let after = ProjectFile::from_json(json)?.into_snapshot()?;
    let before = editor.state().snapshot();
    let command = ReplaceStateCommand::load_project(before, after);
    Ok(editor.execute(command, ExecuteMode::Apply))
}

pub fn load_project(editor: &mut Editor, path: &Path) -> crate::Result<CommandMeta> {
    let json = fs::read_to_string(path)?;
    let meta = load_project_json(editor, &json)?;
    let doc = editor.state().document();
    info!(
        "Loaded project {} ({} {}x{})",
        path.display(),
        doc.mode().label(),
        doc.width(),
        doc.height()
    );
    Ok(meta)
}
