use serde::{Deserialize, Serialize};

/// Zoom factors the editor supports.
pub const ZOOM_LEVELS: [u32; 6] = [1, 2, 4, 8, 16, 32];
pub const DEFAULT_ZOOM: u32 = 4;

/// How the document is presented: zoom, pan, and display toggles.
///
/// Serialized with camelCase keys as part of a project file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSettings {
    #[serde(default = "default_zoom")]
    pub zoom: u32,
    /// Document column shown at the left edge of the viewport.
    #[serde(default)]
    pub offset_x: i32,
    /// Document row shown at the top edge of the viewport.
    #[serde(default)]
    pub offset_y: i32,
    #[serde(default)]
    pub show_grid: bool,
    #[serde(default)]
    pub cycle_animation_enabled: bool,
}

fn default_zoom() -> u32 {
    DEFAULT_ZOOM
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            offset_x: 0,
            offset_y: 0,
            show_grid: false,
            cycle_animation_enabled: false,
        }
    }
}

impl ViewSettings {
    /// Set the zoom; unsupported factors fall back to [`DEFAULT_ZOOM`].
    pub fn set_zoom(&mut self, zoom: u32) {
        self.zoom = normalize_zoom(zoom);
    }

    /// Return a copy whose zoom is one of [`ZOOM_LEVELS`].
    pub fn normalized(mut self) -> Self {
        self.zoom = normalize_zoom(self.zoom);
        self
    }

    /// Next larger supported zoom, or the current one at the maximum.
    pub fn zoom_in(&mut self) {
        if let Some(&z) = ZOOM_LEVELS.iter().find(|&&z| z > self.zoom) {
            self.zoom = z;
        }
    }

    /// Next smaller supported zoom, or the current one at the minimum.
    pub fn zoom_out(&mut self) {
        if let Some(&z) = ZOOM_LEVELS.iter().rev().find(|&&z| z < self.zoom) {
            self.zoom = z;
        }
    }

    /// Map a viewport pixel to a document pixel, clamped into the document.
    pub fn screen_to_document(&self, sx: f64, sy: f64, width: u32, height: u32) -> (i32, i32) {
        let zoom = self.zoom.max(1) as f64;
        let x = (sx / zoom).floor() as i64 + self.offset_x as i64;
        let y = (sy / zoom).floor() as i64 + self.offset_y as i64;
        (
            x.clamp(0, width.saturating_sub(1) as i64) as i32,
            y.clamp(0, height.saturating_sub(1) as i64) as i32,
        )
    }

    /// Top-left viewport pixel of a document pixel.
    pub fn document_to_screen(&self, x: i32, y: i32) -> (i64, i64) {
        let zoom = self.zoom as i64;
        (
            (x as i64 - self.offset_x as i64) * zoom,
            (y as i64 - self.offset_y as i64) * zoom,
        )
    }
}

fn normalize_zoom(zoom: u32) -> u32 {
    if ZOOM_LEVELS.contains(&zoom) {
        zoom
    } else {
        DEFAULT_ZOOM
    }
}
