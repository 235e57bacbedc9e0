//! Integer rasterization: Bresenham lines, rectangles, and 4-connected flood fill.

use crate::document::{Canvas, Document};

// ---------------------------------------------------------------------------
// Lines
// ---------------------------------------------------------------------------

/// The discrete points of a Bresenham segment, both endpoints included.
///
/// Consecutive points are always 8-adjacent, so the path has no gaps. The
/// major axis advances on every step, which lets [`clipped`](Self::clipped)
/// jump straight to the part of a long segment that lies on a canvas.
#[derive(Debug, Clone)]
pub struct LinePoints {
    x0: i64,
    y0: i64,
    x: i64,
    y: i64,
    dx: i64,
    dy: i64,
    sx: i64,
    sy: i64,
    err: i64,
    /// Index of the next point along the major axis.
    step: i64,
    /// Index of the final point (inclusive).
    last: i64,
}

impl LinePoints {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        let (x0, y0, x1, y1) = (x0 as i64, y0 as i64, x1 as i64, y1 as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        Self {
            x0,
            y0,
            x: x0,
            y: y0,
            dx,
            dy,
            sx: if x0 < x1 { 1 } else { -1 },
            sy: if y0 < y1 { 1 } else { -1 },
            err: dx + dy,
            step: 0,
            last: dx.max(-dy),
        }
    }

    /// Restrict the remaining points to `[0, width) × [0, height)`.
    ///
    /// Yields exactly the in-bounds points the unclipped iterator would,
    /// without walking the out-of-bounds ones.
    pub fn clipped(mut self, width: u32, height: u32) -> Self {
        let (w, h) = (i64::from(width), i64::from(height));
        let x_major = self.dx >= -self.dy;
        let (major, minor) = if x_major {
            (
                axis_range(self.x0, self.sx, w),
                axis_range(self.y0, self.sy, h),
            )
        } else {
            (
                axis_range(self.y0, self.sy, h),
                axis_range(self.x0, self.sx, w),
            )
        };
        let lo = self.step.max(major.0);
        let hi = self.last.min(major.1);
        if lo > hi {
            self.step = self.last + 1;
            return self;
        }
        // Minor-axis progress is non-decreasing in the step index.
        let lo = first_step(lo, hi, |k| self.minor_steps(k) >= minor.0);
        let hi = first_step(lo, hi, |k| self.minor_steps(k) > minor.1) - 1;
        self.seek(lo);
        self.last = hi;
        self
    }

    /// How many times the minor axis has moved by step `k`.
    fn minor_steps(&self, k: i64) -> i64 {
        let (adx, ady) = (i128::from(self.dx), i128::from(-self.dy));
        let k = i128::from(k);
        let m = if adx >= ady {
            if adx == 0 {
                0
            } else {
                (2 * k * ady + adx) / (2 * adx)
            }
        } else {
            (2 * k * adx + ady) / (2 * ady)
        };
        m as i64
    }

    /// Put the iterator at step `k` with the error term it would have there.
    fn seek(&mut self, k: i64) {
        let (adx, ady) = (i128::from(self.dx), i128::from(-self.dy));
        let m = self.minor_steps(k);
        let (k, m128) = (i128::from(k), i128::from(m));
        if adx >= ady {
            self.x = self.x0 + self.sx * k as i64;
            self.y = self.y0 + self.sy * m;
            self.err = ((adx - ady) - k * ady + m128 * adx) as i64;
        } else {
            self.x = self.x0 + self.sx * m;
            self.y = self.y0 + self.sy * k as i64;
            self.err = ((adx - ady) + k * adx - m128 * ady) as i64;
        }
        self.step = k as i64;
    }
}

/// Steps `k` for which `origin + step * k` lies in `[0, size)`.
fn axis_range(origin: i64, step: i64, size: i64) -> (i64, i64) {
    if step > 0 {
        (-origin, size - 1 - origin)
    } else {
        (origin - (size - 1), origin)
    }
}

/// Smallest `k` in `lo..=hi` where `pred` holds, or `hi + 1`. `pred` must be
/// monotone.
fn first_step(mut lo: i64, hi: i64, pred: impl Fn(i64) -> bool) -> i64 {
    let mut end = hi + 1;
    while lo < end {
        let mid = lo + (end - lo) / 2;
        if pred(mid) {
            end = mid;
        } else {
            lo = mid + 1;
        }
    }
    lo
}

impl Iterator for LinePoints {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<(i32, i32)> {
        if self.step > self.last {
            return None;
        }
        // Every point lies between two i32 endpoints.
        let point = (self.x as i32, self.y as i32);
        self.step += 1;
        if self.step <= self.last {
            let e2 = 2 * self.err;
            if e2 >= self.dy {
                self.err += self.dy;
                self.x += self.sx;
            }
            if e2 <= self.dx {
                self.err += self.dx;
                self.y += self.sy;
            }
        }
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::try_from((self.last - self.step + 1).max(0)).unwrap_or(usize::MAX);
        (n, Some(n))
    }
}

/// Write `value` along the segment `(x0, y0)`–`(x1, y1)`. Points outside the
/// canvas are skipped. Returns how many pixels were written.
pub fn draw_line<C: Canvas>(
    canvas: &mut C,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    value: C::Pixel,
) -> usize {
    let (w, h) = (canvas.width(), canvas.height());
    LinePoints::new(x0, y0, x1, y1)
        .clipped(w, h)
        .filter(|&(x, y)| canvas.set(x, y, value))
        .count()
}

// ---------------------------------------------------------------------------
// Rectangles
// ---------------------------------------------------------------------------

/// Draw the rectangle spanned by two corners.
///
/// Filled rectangles are one horizontal line per row of the bounding box;
/// outlines are the four border segments.
pub fn draw_rect<C: Canvas>(
    canvas: &mut C,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    value: C::Pixel,
    filled: bool,
) {
    if filled {
        let (min_x, max_x) = (x0.min(x1), x0.max(x1));
        for y in y0.min(y1)..=y0.max(y1) {
            draw_line(canvas, min_x, y, max_x, y, value);
        }
        return;
    }
    draw_line(canvas, x0, y0, x1, y0, value);
    draw_line(canvas, x1, y0, x1, y1, value);
    draw_line(canvas, x1, y1, x0, y1, value);
    draw_line(canvas, x0, y1, x0, y0, value);
}

// ---------------------------------------------------------------------------
// Flood fill
// ---------------------------------------------------------------------------

/// Replace the 4-connected region of same-valued pixels containing `(x, y)`.
///
/// Does nothing when the seed is out of bounds or already holds `value`.
/// Uses an explicit stack, so region size is bounded only by memory.
/// Returns the number of pixels changed.
pub fn flood_fill<C: Canvas>(canvas: &mut C, x: i32, y: i32, value: C::Pixel) -> usize {
    let Some(seed) = canvas.index_of(x, y) else {
        return 0;
    };
    let w = canvas.width() as usize;
    let h = canvas.height() as usize;
    let pixels = canvas.pixels_mut();
    let target = pixels[seed];
    if target == value {
        return 0;
    }

    // Pixels are recoloured when pushed, which doubles as the visited mark.
    let mut stack: Vec<usize> = Vec::with_capacity(1024);
    pixels[seed] = value;
    stack.push(seed);
    let mut filled = 1;

    while let Some(idx) = stack.pop() {
        let px = idx % w;
        let py = idx / w;
        let neighbors = [
            (px > 0).then(|| idx - 1),
            (px + 1 < w).then(|| idx + 1),
            (py > 0).then(|| idx - w),
            (py + 1 < h).then(|| idx + w),
        ];
        for ni in neighbors.into_iter().flatten() {
            if pixels[ni] == target {
                pixels[ni] = value;
                stack.push(ni);
                filled += 1;
            }
        }
    }
    filled
}

// ---------------------------------------------------------------------------
// Document dispatch
// ---------------------------------------------------------------------------

/// Indexed documents keep the low byte of a draw value.
#[inline]
fn index_value(value: u32) -> u8 {
    (value & 0xff) as u8
}

impl Document {
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, value: u32) -> usize {
        match self {
            Self::Indexed(img) => draw_line(img, x0, y0, x1, y1, index_value(value)),
            Self::Direct(img) => draw_line(img, x0, y0, x1, y1, value),
        }
    }

    pub fn draw_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, value: u32, filled: bool) {
        match self {
            Self::Indexed(img) => draw_rect(img, x0, y0, x1, y1, index_value(value), filled),
            Self::Direct(img) => draw_rect(img, x0, y0, x1, y1, value, filled),
        }
    }

    pub fn flood_fill(&mut self, x: i32, y: i32, value: u32) -> usize {
        match self {
            Self::Indexed(img) => flood_fill(img, x, y, index_value(value)),
            Self::Direct(img) => flood_fill(img, x, y, value),
        }
    }

    /// Set every pixel to `value`.
    pub fn clear(&mut self, value: u32) {
        match self {
            Self::Indexed(img) => img.pixels_mut().fill(index_value(value)),
            Self::Direct(img) => img.pixels_mut().fill(value),
        }
    }
}
