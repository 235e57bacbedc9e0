use std::time::Duration;

use serde::Serialize;

/// Largest palette an indexed document can reference.
pub const MAX_PALETTE_SIZE: usize = 256;
/// Smallest palette the editor keeps; removals below this are ignored.
pub const MIN_PALETTE_SIZE: usize = 2;
/// Length of the palette a fresh editor starts with.
pub const DEFAULT_PALETTE_LENGTH: usize = 32;
pub const DEFAULT_FOREGROUND_INDEX: usize = 1;
pub const DEFAULT_BACKGROUND_INDEX: usize = 0;

/// Fastest cycle rate honoured, in steps per second.
pub const MAX_CYCLE_RATE: u16 = 60;
const MIN_CYCLE_INTERVAL: Duration = Duration::from_millis(30);
const DEFAULT_CYCLE_INTERVAL: Duration = Duration::from_millis(250);

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// One palette entry, straight (non-premultiplied) RGBA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PaletteColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl PaletteColor {
    pub const BLACK: Self = Self::opaque(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Build a color from arbitrary numeric channels, rounding and clamping
    /// each to `0..=255`. Non-finite channels become 0.
    pub fn from_channels(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
            a: clamp_channel(a),
        }
    }

    /// Pack into the direct-color pixel representation (`[r, g, b, a]` in
    /// little-endian memory order).
    #[inline]
    pub fn pack(self) -> u32 {
        u32::from_le_bytes([self.r, self.g, self.b, self.a])
    }

    #[inline]
    pub fn unpack(value: u32) -> Self {
        let [r, g, b, a] = value.to_le_bytes();
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Squared RGBA distance, used for nearest-entry lookups.
    pub fn distance_sq(self, other: Self) -> u32 {
        let d = |a: u8, b: u8| {
            let v = a as i32 - b as i32;
            (v * v) as u32
        };
        d(self.r, other.r) + d(self.g, other.g) + d(self.b, other.b) + d(self.a, other.a)
    }
}

impl Default for PaletteColor {
    fn default() -> Self {
        Self::BLACK
    }
}

fn clamp_channel(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

/// Channels arrive as plain JSON numbers and may be out of range or
/// fractional; they are sanitized on the way in.
impl<'de> serde::Deserialize<'de> for PaletteColor {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Raw {
            r: f64,
            g: f64,
            b: f64,
            #[serde(default = "opaque_alpha")]
            a: f64,
        }
        fn opaque_alpha() -> f64 {
            255.0
        }
        let raw = Raw::deserialize(deserializer)?;
        Ok(Self::from_channels(raw.r, raw.g, raw.b, raw.a))
    }
}

// ---------------------------------------------------------------------------
// Color cycling
// ---------------------------------------------------------------------------

/// A contiguous palette range rotated periodically (the ILBM `CRNG` record).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
pub struct CycleRange {
    /// Steps per second; capped at [`MAX_CYCLE_RATE`] when animating.
    pub rate: u16,
    pub low: u8,
    /// Inclusive.
    pub high: u8,
    pub active: bool,
}

impl CycleRange {
    pub fn new(rate: u16, low: u8, high: u8, active: bool) -> Self {
        Self {
            rate,
            low,
            high,
            active,
        }
    }

    /// Whether this range can be animated against a palette of `palette_len` entries.
    pub fn is_usable(&self, palette_len: usize) -> bool {
        self.active && self.high > self.low && (self.high as usize) < palette_len
    }

    /// Time between single-step rotations.
    pub fn interval(&self) -> Duration {
        if self.rate == 0 {
            return DEFAULT_CYCLE_INTERVAL;
        }
        let capped = self.rate.min(MAX_CYCLE_RATE) as u64;
        Duration::from_nanos(1_000_000_000 / capped).max(MIN_CYCLE_INTERVAL)
    }
}

/// Rotate `colors[low..=high]` forward by `steps`: the entry at `high` moves
/// to `low` and every other entry shifts up by one per step.
///
/// Returns `false` (leaving `colors` untouched) when the range is empty, out
/// of bounds, or the rotation is a whole number of turns.
pub fn rotate_range(colors: &mut [PaletteColor], low: usize, high: usize, steps: i64) -> bool {
    if high <= low || high >= colors.len() {
        return false;
    }
    let len = (high - low + 1) as i64;
    let normalized = steps.rem_euclid(len) as usize;
    if normalized == 0 {
        return false;
    }
    colors[low..=high].rotate_right(normalized);
    true
}

// ---------------------------------------------------------------------------
// Palette state
// ---------------------------------------------------------------------------

/// The editor's palette: colors, drawing indices, and cycle ranges.
///
/// Every mutation keeps the invariants: `MIN_PALETTE_SIZE..=MAX_PALETTE_SIZE`
/// entries, foreground and background always valid indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<PaletteColor>,
    foreground: usize,
    background: usize,
    cycles: Vec<CycleRange>,
}

impl Palette {
    /// Build a palette, sanitizing the color list and clamping both indices.
    pub fn new(
        colors: Vec<PaletteColor>,
        foreground: usize,
        background: usize,
        cycles: Vec<CycleRange>,
    ) -> Self {
        let colors = sanitize_colors(colors);
        let max = colors.len() - 1;
        Self {
            colors,
            foreground: foreground.min(max),
            background: background.min(max),
            cycles,
        }
    }

    /// Default palette of `length` entries (clamped to the legal range).
    pub fn with_length(length: usize) -> Self {
        Self::new(
            default_colors(length),
            DEFAULT_FOREGROUND_INDEX,
            DEFAULT_BACKGROUND_INDEX,
            Vec::new(),
        )
    }

    pub fn colors(&self) -> &[PaletteColor] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn color(&self, index: usize) -> Option<PaletteColor> {
        self.colors.get(index).copied()
    }

    pub fn foreground(&self) -> usize {
        self.foreground
    }

    pub fn background(&self) -> usize {
        self.background
    }

    pub fn foreground_color(&self) -> PaletteColor {
        self.colors[self.foreground]
    }

    pub fn background_color(&self) -> PaletteColor {
        self.colors[self.background]
    }

    pub fn cycles(&self) -> &[CycleRange] {
        &self.cycles
    }

    /// Index of the entry closest to `color`; ties resolve to the lowest index.
    pub fn nearest_index(&self, color: PaletteColor) -> usize {
        self.colors
            .iter()
            .enumerate()
            .min_by_key(|(_, c)| c.distance_sq(color))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    /// Replace the whole color list.
    pub fn set_colors(&mut self, colors: Vec<PaletteColor>) {
        self.colors = sanitize_colors(colors);
        self.reclamp();
    }

    /// Overwrite one entry. Out-of-range indices are ignored.
    pub fn update_color(&mut self, index: usize, color: PaletteColor) -> bool {
        match self.colors.get_mut(index) {
            Some(slot) => {
                *slot = color;
                true
            }
            None => false,
        }
    }

    /// Insert a color at `index` (clamped to `0..=len`). No-op when full.
    ///
    /// Foreground/background indices at or after the insertion point shift up
    /// so they keep pointing at the same color.
    pub fn insert_color(&mut self, index: usize, color: PaletteColor) -> bool {
        if self.colors.len() >= MAX_PALETTE_SIZE {
            return false;
        }
        let at = index.min(self.colors.len());
        self.colors.insert(at, color);
        if self.foreground >= at {
            self.foreground += 1;
        }
        if self.background >= at {
            self.background += 1;
        }
        true
    }

    /// Remove the color at `index` (clamped to the last entry). No-op at the
    /// minimum size.
    pub fn remove_color(&mut self, index: usize) -> bool {
        if self.colors.len() <= MIN_PALETTE_SIZE {
            return false;
        }
        let at = index.min(self.colors.len() - 1);
        self.colors.remove(at);
        let len = self.colors.len();
        let adjust = |value: usize| -> usize {
            if value == at {
                value.min(len - 1)
            } else if value > at {
                value - 1
            } else {
                value
            }
        };
        self.foreground = adjust(self.foreground);
        self.background = adjust(self.background);
        true
    }

    pub fn set_cycles(&mut self, cycles: Vec<CycleRange>) {
        self.cycles = cycles;
    }

    /// Select the foreground entry, clamped into range.
    pub fn set_foreground(&mut self, index: usize) {
        self.foreground = index.min(self.colors.len() - 1);
    }

    /// Select the background entry, clamped into range.
    pub fn set_background(&mut self, index: usize) {
        self.background = index.min(self.colors.len() - 1);
    }

    /// Rotate a sub-range of the colors in place; see [`rotate_range`].
    pub fn rotate_range(&mut self, low: usize, high: usize, steps: i64) -> bool {
        rotate_range(&mut self.colors, low, high, steps)
    }

    fn reclamp(&mut self) {
        let max = self.colors.len() - 1;
        self.foreground = self.foreground.min(max);
        self.background = self.background.min(max);
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::with_length(DEFAULT_PALETTE_LENGTH)
    }
}

/// Truncate to [`MAX_PALETTE_SIZE`] and pad with opaque black up to
/// [`MIN_PALETTE_SIZE`].
pub fn sanitize_colors(mut colors: Vec<PaletteColor>) -> Vec<PaletteColor> {
    colors.truncate(MAX_PALETTE_SIZE);
    while colors.len() < MIN_PALETTE_SIZE {
        colors.push(PaletteColor::BLACK);
    }
    colors
}

// ---------------------------------------------------------------------------
// Builtin colors
// ---------------------------------------------------------------------------

/// The classic 32-color paint-program palette used for new documents.
const CLASSIC_32: [[u8; 3]; 32] = [
    [0, 0, 0],
    [136, 136, 136],
    [255, 255, 255],
    [0, 0, 255],
    [0, 136, 255],
    [0, 255, 255],
    [0, 255, 136],
    [0, 255, 0],
    [136, 255, 0],
    [255, 255, 0],
    [255, 136, 0],
    [255, 0, 0],
    [255, 0, 136],
    [255, 0, 255],
    [136, 0, 255],
    [0, 0, 136],
    [0, 68, 255],
    [0, 136, 136],
    [0, 136, 68],
    [0, 136, 0],
    [68, 136, 0],
    [136, 136, 0],
    [136, 68, 0],
    [136, 0, 0],
    [136, 0, 68],
    [136, 0, 136],
    [68, 0, 136],
    [0, 0, 68],
    [0, 34, 255],
    [0, 68, 136],
    [0, 68, 68],
    [0, 68, 0],
];

/// Default colors for a palette of `length` entries.
///
/// Up to 32 entries come from the classic table; longer palettes continue
/// with a grey ramp whose level equals the entry index.
pub fn default_colors(length: usize) -> Vec<PaletteColor> {
    let length = length.clamp(MIN_PALETTE_SIZE, MAX_PALETTE_SIZE);
    (0..length)
        .map(|i| match CLASSIC_32.get(i) {
            Some(&[r, g, b]) => PaletteColor::opaque(r, g, b),
            None => PaletteColor::opaque(i as u8, i as u8, i as u8),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn grey(v: u8) -> PaletteColor {
        PaletteColor::opaque(v, v, v)
    }

    #[test]
    fn default_palette_shape() {
        let p = Palette::default();
        assert_eq!(p.len(), 32);
        assert_eq!(p.foreground(), 1);
        assert_eq!(p.background(), 0);
        assert_eq!(p.color(2), Some(PaletteColor::opaque(255, 255, 255)));
    }

    #[test]
    fn default_colors_extend_with_grey_ramp() {
        let colors = default_colors(40);
        assert_eq!(colors.len(), 40);
        assert_eq!(colors[35], grey(35));
        assert_eq!(default_colors(1).len(), MIN_PALETTE_SIZE);
        assert_eq!(default_colors(1000).len(), MAX_PALETTE_SIZE);
    }

    #[test]
    fn new_pads_truncates_and_clamps() {
        let p = Palette::new(vec![grey(1)], 9, 9, Vec::new());
        assert_eq!(p.len(), 2);
        assert_eq!(p.color(1), Some(PaletteColor::BLACK));
        assert_eq!(p.foreground(), 1);

        let p = Palette::new(vec![grey(0); 300], 0, 0, Vec::new());
        assert_eq!(p.len(), MAX_PALETTE_SIZE);
    }

    #[test]
    fn insert_shifts_indices_at_or_after() {
        let mut p = Palette::new(vec![grey(0), grey(1), grey(2), grey(3)], 2, 1, Vec::new());
        assert!(p.insert_color(2, grey(9)));
        assert_eq!(p.foreground(), 3);
        assert_eq!(p.background(), 1);
        assert_eq!(p.color(2), Some(grey(9)));
        assert_eq!(p.foreground_color(), grey(2));
    }

    #[test]
    fn insert_past_end_appends() {
        let mut p = Palette::new(vec![grey(0), grey(1)], 0, 1, Vec::new());
        assert!(p.insert_color(99, grey(7)));
        assert_eq!(p.colors().last(), Some(&grey(7)));
        assert_eq!(p.background(), 1);
    }

    #[test]
    fn insert_when_full_is_noop() {
        let mut p = Palette::with_length(MAX_PALETTE_SIZE);
        let before = p.clone();
        assert!(!p.insert_color(0, grey(1)));
        assert_eq!(p, before);
    }

    #[test]
    fn remove_adjusts_indices() {
        let mut p = Palette::new(vec![grey(0), grey(1), grey(2), grey(3)], 3, 1, Vec::new());
        assert!(p.remove_color(1));
        // Background pointed at the removed entry and index 1 still exists.
        assert_eq!(p.background(), 1);
        // Foreground was after the removed entry.
        assert_eq!(p.foreground(), 2);
        assert_eq!(p.foreground_color(), grey(3));
    }

    #[test]
    fn remove_last_clamps_index_pointing_at_it() {
        let mut p = Palette::new(vec![grey(0), grey(1), grey(2)], 2, 0, Vec::new());
        assert!(p.remove_color(2));
        assert_eq!(p.foreground(), 1);
    }

    #[test]
    fn remove_at_minimum_is_noop() {
        let mut p = Palette::new(vec![grey(0), grey(1)], 1, 0, Vec::new());
        assert!(!p.remove_color(0));
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn insert_then_remove_round_trips() {
        let mut p = Palette::default();
        let original = p.colors().to_vec();
        p.insert_color(5, grey(200));
        p.remove_color(5);
        assert_eq!(p.colors(), original.as_slice());
        assert_eq!(p.foreground(), 1);
        assert_eq!(p.background(), 0);
    }

    #[test]
    fn set_colors_reclamps_indices() {
        let mut p = Palette::default();
        p.set_foreground(30);
        p.set_colors(vec![grey(0), grey(1), grey(2)]);
        assert_eq!(p.foreground(), 2);
    }

    #[test]
    fn update_out_of_range_is_ignored() {
        let mut p = Palette::default();
        let before = p.clone();
        assert!(!p.update_color(500, grey(4)));
        assert_eq!(p, before);
    }

    #[test]
    fn rotate_moves_high_to_low() {
        let mut colors = vec![grey(0), grey(1), grey(2), grey(3), grey(4)];
        assert!(rotate_range(&mut colors, 0, 3, 1));
        assert_eq!(colors, vec![grey(3), grey(0), grey(1), grey(2), grey(4)]);
    }

    #[test]
    fn rotate_negative_and_full_turns() {
        let mut colors = vec![grey(0), grey(1), grey(2)];
        assert!(!rotate_range(&mut colors, 0, 2, 3));
        assert!(rotate_range(&mut colors, 0, 2, -1));
        assert_eq!(colors, vec![grey(1), grey(2), grey(0)]);
        assert!(!rotate_range(&mut colors, 1, 1, 1));
        assert!(!rotate_range(&mut colors, 0, 5, 1));
    }

    #[test]
    fn cycle_interval_bounds() {
        assert_eq!(CycleRange::new(0, 0, 3, true).interval(), Duration::from_millis(250));
        assert_eq!(CycleRange::new(10, 0, 3, true).interval(), Duration::from_millis(100));
        // 60/s would be ~16.7ms; the floor is 30ms.
        assert_eq!(CycleRange::new(200, 0, 3, true).interval(), Duration::from_millis(30));
    }

    #[test]
    fn cycle_usability() {
        assert!(CycleRange::new(5, 0, 3, true).is_usable(4));
        assert!(!CycleRange::new(5, 0, 4, true).is_usable(4));
        assert!(!CycleRange::new(5, 3, 3, true).is_usable(4));
        assert!(!CycleRange::new(5, 0, 3, false).is_usable(4));
    }

    #[test]
    fn pack_unpack_is_byte_order_rgba() {
        let c = PaletteColor::new(1, 2, 3, 4);
        assert_eq!(c.pack().to_le_bytes(), [1, 2, 3, 4]);
        assert_eq!(PaletteColor::unpack(c.pack()), c);
    }

    #[test]
    fn deserialize_clamps_channels() {
        let c: PaletteColor =
            serde_json::from_str(r#"{"r": 300, "g": -4, "b": 12.6}"#).unwrap();
        assert_eq!(c, PaletteColor::new(255, 0, 13, 255));
    }

    #[test]
    fn nearest_index_prefers_exact_match() {
        let p = Palette::default();
        assert_eq!(p.nearest_index(PaletteColor::opaque(255, 0, 0)), 11);
        assert_eq!(p.nearest_index(PaletteColor::opaque(250, 250, 250)), 2);
    }
}
