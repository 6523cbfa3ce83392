// SPDX-License-Identifier: MIT
//
// Surface — what the bar renderer draws on.
//
// The renderer only ever issues three primitives: a flat rectangle, a
// two-color vertical gradient, and a four-corner bilinear quad. Anything
// that can do those three things is a `Surface`. `PixelBuffer` is the
// in-memory one used for previews and PNG output; `CommandList` (in
// `commands.rs`) records calls instead of executing them.
//
// Determinism:
//
//   - Vertical gradients sample each row at its pixel center,
//     t = (row + 0.5) / height.
//
//   - Bilinear quads are evaluated on a fixed BILINEAR_SAMPLES ×
//     BILINEAR_SAMPLES grid, then scaled to the target rectangle by
//     nearest sample. First and last rows/columns of the target map to
//     first and last samples, so corners land exactly on corner colors.
//
// Nothing here depends on anything but its inputs, so the same calls
// always produce the same bytes.

use hued_color::Rgb;

use crate::geometry::{Quad, Rect};

/// Side length of the sample grid a bilinear quad is evaluated on.
pub const BILINEAR_SAMPLES: u32 = 40;

// ─── Surface ─────────────────────────────────────────────────────────────────

/// A pixel target for the bar renderer.
///
/// Implementations clip every primitive to `0..width × 0..height`.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Fill `rect` with one color.
    fn fill_rect(&mut self, rect: Rect, color: Rgb);

    /// Fill `rect` with a gradient from `top` (first row) to `bottom`
    /// (last row).
    fn fill_vertical_gradient(&mut self, rect: Rect, top: Rgb, bottom: Rgb);

    /// Fill `rect` with a bilinear blend of four corner colors.
    fn fill_bilinear(&mut self, rect: Rect, quad: Quad);

    /// The whole surface as a rectangle.
    fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width(), self.height())
    }
}

// ─── Sampling helpers ────────────────────────────────────────────────────────

/// Evaluate `quad` on the fixed sample grid, row-major.
#[must_use]
pub fn bilinear_samples(quad: Quad) -> Vec<Rgb> {
    let last = f64::from(BILINEAR_SAMPLES - 1);
    (0..BILINEAR_SAMPLES)
        .flat_map(|y| (0..BILINEAR_SAMPLES).map(move |x| quad.sample(f64::from(x) / last, f64::from(y) / last)))
        .collect()
}

/// Nearest sample index for offset `pos` within a span of `len` pixels.
/// Offsets `0` and `len - 1` map to the first and last sample.
#[must_use]
pub fn sample_index(pos: u32, len: u32) -> u32 {
    if len <= 1 {
        return 0;
    }
    let span = u64::from(len - 1);
    let last = BILINEAR_SAMPLES - 1;
    let scaled = (u64::from(pos) * u64::from(last) * 2 + span) / (2 * span);
    u32::try_from(scaled).map_or(last, |i| i.min(last))
}

/// Color of row `row` in a vertical gradient `height` rows tall.
#[must_use]
pub fn gradient_row(top: Rgb, bottom: Rgb, row: u32, height: u32) -> Rgb {
    if height == 0 {
        return top;
    }
    let t = (f64::from(row) + 0.5) / f64::from(height);
    top.lerp(bottom, t)
}

// ─── PixelBuffer ─────────────────────────────────────────────────────────────

/// An in-memory RGB image.
///
/// Row-major: `index = y * width + x`. Starts out black.
///
/// # Examples
///
/// ```
/// use hued_color::Rgb;
/// use hued_render::{PixelBuffer, Rect, Surface};
///
/// let mut buf = PixelBuffer::new(4, 2);
/// buf.fill_rect(Rect::new(1, 0, 2, 1), Rgb::WHITE);
/// assert_eq!(buf.get(1, 0), Some(Rgb::WHITE));
/// assert_eq!(buf.get(0, 0), Some(Rgb::BLACK));
/// assert_eq!(buf.get(4, 0), None);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl PixelBuffer {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgb::BLACK)
    }

    #[must_use]
    pub fn filled(width: u32, height: u32, color: Rgb) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: vec![color; size],
        }
    }

    #[inline]
    const fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<Rgb> {
        (x < self.width && y < self.height).then(|| self.pixels[self.index(x, y)])
    }

    /// All pixels, row-major.
    #[must_use]
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// One row, or `None` past the bottom.
    #[must_use]
    pub fn row(&self, y: u32) -> Option<&[Rgb]> {
        (y < self.height).then(|| {
            let start = self.index(0, y);
            &self.pixels[start..start + self.width as usize]
        })
    }

    /// Packed `r, g, b` bytes, row-major, for image encoders.
    #[must_use]
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_array()).collect()
    }

    /// Clip `rect` to the buffer and run `paint(x, y)` for every pixel in it.
    fn paint(&mut self, rect: Rect, mut paint: impl FnMut(u32, u32) -> Rgb) {
        let Some(clip) = rect.intersect(self.bounds()) else {
            return;
        };
        for y in clip.y..clip.bottom() {
            for x in clip.x..clip.right() {
                let idx = self.index(x, y);
                self.pixels[idx] = paint(x, y);
            }
        }
    }
}

impl Surface for PixelBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.paint(rect, |_, _| color);
    }

    fn fill_vertical_gradient(&mut self, rect: Rect, top: Rgb, bottom: Rgb) {
        self.paint(rect, |_, y| gradient_row(top, bottom, y - rect.y, rect.height));
    }

    fn fill_bilinear(&mut self, rect: Rect, quad: Quad) {
        if rect.is_empty() {
            return;
        }
        let samples = bilinear_samples(quad);
        let stride = BILINEAR_SAMPLES as usize;
        self.paint(rect, |x, y| {
            let sx = sample_index(x - rect.x, rect.width) as usize;
            let sy = sample_index(y - rect.y, rect.height) as usize;
            samples[sy * stride + sx]
        });
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 255);

    // ── Sampling ────────────────────────────────────────────────────────

    #[test]
    fn sample_index_hits_both_ends() {
        for len in [2, 3, 7, 40, 41, 500] {
            assert_eq!(sample_index(0, len), 0, "len {len}");
            assert_eq!(sample_index(len - 1, len), BILINEAR_SAMPLES - 1, "len {len}");
        }
        assert_eq!(sample_index(0, 1), 0);
        assert_eq!(sample_index(0, 0), 0);
    }

    #[test]
    fn sample_index_is_monotonic() {
        let len = 123;
        let mut prev = 0;
        for pos in 0..len {
            let idx = sample_index(pos, len);
            assert!(idx >= prev);
            prev = idx;
        }
    }

    #[test]
    fn gradient_rows_sample_centers() {
        assert_eq!(gradient_row(Rgb::BLACK, Rgb::WHITE, 0, 2), Rgb::new(64, 64, 64));
        assert_eq!(gradient_row(Rgb::BLACK, Rgb::WHITE, 1, 2), Rgb::new(191, 191, 191));
        assert_eq!(gradient_row(RED, RED, 3, 4), RED);
    }

    // ── PixelBuffer ─────────────────────────────────────────────────────

    #[test]
    fn fill_rect_clips_to_bounds() {
        let mut buf = PixelBuffer::new(4, 4);
        buf.fill_rect(Rect::new(2, 2, 10, 10), RED);
        assert_eq!(buf.get(3, 3), Some(RED));
        assert_eq!(buf.get(1, 1), Some(Rgb::BLACK));
        assert_eq!(buf.pixels().iter().filter(|&&p| p == RED).count(), 4);
    }

    #[test]
    fn bilinear_corners_are_exact() {
        let mut buf = PixelBuffer::new(10, 6);
        let quad = Quad::new(RED, BLUE, Rgb::WHITE, Rgb::BLACK);
        buf.fill_bilinear(buf.bounds(), quad);
        assert_eq!(buf.get(0, 0), Some(RED));
        assert_eq!(buf.get(9, 0), Some(BLUE));
        assert_eq!(buf.get(9, 5), Some(Rgb::WHITE));
        assert_eq!(buf.get(0, 5), Some(Rgb::BLACK));
    }

    #[test]
    fn bilinear_offset_rect_maps_locally() {
        let mut buf = PixelBuffer::new(8, 4);
        buf.fill_bilinear(Rect::new(4, 1, 4, 2), Quad::horizontal(RED, BLUE));
        assert_eq!(buf.get(4, 1), Some(RED));
        assert_eq!(buf.get(7, 2), Some(BLUE));
        assert_eq!(buf.get(3, 1), Some(Rgb::BLACK));
    }

    #[test]
    fn vertical_gradient_is_flat_when_colors_match() {
        let mut buf = PixelBuffer::new(3, 5);
        buf.fill_vertical_gradient(buf.bounds(), BLUE, BLUE);
        assert!(buf.pixels().iter().all(|&p| p == BLUE));
    }

    #[test]
    fn rgb_bytes_are_packed_row_major() {
        let mut buf = PixelBuffer::new(2, 1);
        buf.fill_rect(Rect::new(1, 0, 1, 1), Rgb::new(1, 2, 3));
        assert_eq!(buf.to_rgb_bytes(), vec![0, 0, 0, 1, 2, 3]);
    }
}
