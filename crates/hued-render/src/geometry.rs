// SPDX-License-Identifier: MIT
//
// Rect and Quad — the two shapes every draw call is made of.
//
// Surfaces are pixel grids with the origin at the top-left. Coordinates
// are unsigned: the bar layout never produces anything left of or above
// the surface, and anything past the right or bottom edge is clipped by
// the surface itself.

use hued_color::Rgb;

// ─── Rect ────────────────────────────────────────────────────────────────────

/// An axis-aligned pixel rectangle.
///
/// # Examples
///
/// ```
/// use hued_render::Rect;
///
/// let r = Rect::new(2, 3, 10, 4);
/// assert_eq!(r.right(), 12);
/// assert_eq!(r.bottom(), 7);
/// assert!(r.contains(2, 3));
/// assert!(!r.contains(12, 3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    #[inline]
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Right edge (exclusive), saturating.
    #[inline]
    #[must_use]
    pub const fn right(self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive), saturating.
    #[inline]
    #[must_use]
    pub const fn bottom(self) -> u32 {
        self.y.saturating_add(self.height)
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Overlap of two rectangles, or `None` if they don't overlap.
    #[must_use]
    pub fn intersect(self, other: Self) -> Option<Self> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());
        (x2 > x1 && y2 > y1).then(|| Self::new(x1, y1, x2 - x1, y2 - y1))
    }
}

// ─── Quad ────────────────────────────────────────────────────────────────────

/// Four corner colors for a bilinear fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Quad {
    pub top_left: Rgb,
    pub top_right: Rgb,
    pub bottom_right: Rgb,
    pub bottom_left: Rgb,
}

impl Quad {
    #[inline]
    #[must_use]
    pub const fn new(top_left: Rgb, top_right: Rgb, bottom_right: Rgb, bottom_left: Rgb) -> Self {
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        }
    }

    /// A quad that only varies left to right.
    #[inline]
    #[must_use]
    pub const fn horizontal(left: Rgb, right: Rgb) -> Self {
        Self::new(left, right, right, left)
    }

    /// Color at fractional position `(fx, fy)`, both in `0.0..=1.0`.
    ///
    /// Interpolates along the top and bottom edges first, then between
    /// them, rounding at each step.
    #[must_use]
    pub fn sample(self, fx: f64, fy: f64) -> Rgb {
        let top = self.top_left.lerp(self.top_right, fx);
        let bottom = self.bottom_left.lerp(self.bottom_right, fx);
        top.lerp(bottom, fy)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
