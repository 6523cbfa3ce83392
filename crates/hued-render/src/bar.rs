// SPDX-License-Identifier: MIT
//
// Bar rendering — a projected theme drawn at a given fill level.
//
// The picture, outside in:
//
//   border   b = max(1, floor(height / (N + 4)))
//            PC: light over the whole surface, dark over (b, b, w-b, h-b),
//                which leaves a light bevel on the top and left edges.
//            PS1: one bilinear quad over the whole surface.
//   inner    (b, b, w-2b, h-2b), black.
//   fill     inner inset by a padding of b on every side; its width is
//            the padded width scaled by the fill fraction, floored.
//   bands    the fill split into N horizontal bands, band i spanning
//            y + floor(i·h/N) .. y + floor((i+1)·h/N), the last band
//            ending at y + h. Band i is drawn from ramp step i.
//
// Layout is pure integer arithmetic (`layout`, `bands`) so it can be
// checked without drawing anything. `render_bar` walks the layout and
// issues primitives against a `Surface`.
//
// A ramp whose length is not N aborts after the black backdrop: the
// border and inner rectangle stay, no fill is drawn.

use hued_color::{HexColor, Rgb};
use hued_theme::{Corners, RenderableTheme};
use tracing::warn;

use crate::geometry::{Quad, Rect};
use crate::surface::{PixelBuffer, Surface};

// ─── Layout ──────────────────────────────────────────────────────────────────

/// Where everything goes for one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarLayout {
    /// Border thickness, also used as the fill padding.
    pub border: u32,
    /// The whole surface.
    pub outer: Rect,
    /// PC dark border rectangle.
    pub inset: Rect,
    /// Black backdrop.
    pub inner: Rect,
    /// The colored region, or `None` if it has no area.
    pub fill: Option<Rect>,
}

/// One horizontal band of the fill and the ramp step it shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub index: usize,
    pub rect: Rect,
}

/// Clamp a fill fraction to `0.0..=1.0`; NaN counts as empty.
#[must_use]
pub fn clamp_fill(fill: f64) -> f64 {
    if fill.is_nan() { 0.0 } else { fill.clamp(0.0, 1.0) }
}

/// Compute the layout of a `width × height` bar with `steps` ramp steps.
#[must_use]
pub fn layout(width: u32, height: u32, steps: usize, fill: f64) -> BarLayout {
    let divisor = u64::try_from(steps).unwrap_or(u64::MAX).saturating_add(4);
    let border = u32::try_from(u64::from(height) / divisor).unwrap_or(0).max(1);
    let padding = border;

    let outer = Rect::new(0, 0, width, height);
    let inset = Rect::new(
        border,
        border,
        width.saturating_sub(border),
        height.saturating_sub(border),
    );
    let inner = Rect::new(
        border,
        border,
        width.saturating_sub(border * 2),
        height.saturating_sub(border * 2),
    );

    let fill_width = scale_floor(inner.width.saturating_sub(padding * 2), clamp_fill(fill));
    let fill_rect = Rect::new(
        inner.x + padding,
        inner.y + padding,
        fill_width,
        inner.height.saturating_sub(padding * 2),
    );

    BarLayout {
        border,
        outer,
        inset,
        inner,
        fill: (!fill_rect.is_empty()).then_some(fill_rect),
    }
}

/// `floor(value * fraction)` for a fraction in `0.0..=1.0`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale_floor(value: u32, fraction: f64) -> u32 {
    // fraction is clamped, so the product lies in 0..=value.
    (f64::from(value) * fraction).floor() as u32
}

/// Split `rect` into `steps` bands, top to bottom.
///
/// Bands tile `rect` exactly. When `rect` is shorter than `steps`, some
/// bands would have no rows; those are left out.
#[must_use]
pub fn bands(rect: Rect, steps: usize) -> Vec<Band> {
    if steps == 0 {
        return Vec::new();
    }
    let n = steps as u64;
    let h = u64::from(rect.height);
    let edge = |i: u64| -> u32 {
        let offset = if i >= n { h } else { i * h / n };
        // offset ≤ h, which came from a u32.
        rect.y + u32::try_from(offset).unwrap_or(rect.height)
    };

    (0..steps)
        .filter_map(|index| {
            let top = edge(index as u64);
            let bottom = edge(index as u64 + 1);
            (bottom > top).then(|| Band {
                index,
                rect: Rect::new(rect.x, top, rect.width, bottom - top),
            })
        })
        .collect()
}

// ─── Rendering ───────────────────────────────────────────────────────────────

/// Draw `theme` onto `surface` at fill level `fill`.
///
/// `fill` is clamped to `0.0..=1.0`. With `smooth`, each band blends into
/// the next step; the last band repeats step N-1.
pub fn render_bar<S: Surface + ?Sized>(surface: &mut S, theme: &RenderableTheme, fill: f64, smooth: bool, steps: usize) {
    let fill = clamp_fill(fill);
    let geo = layout(surface.width(), surface.height(), steps, fill);

    match theme {
        RenderableTheme::Pc {
            border_light,
            border_dark,
            ..
        } => {
            surface.fill_rect(geo.outer, border_light.to_rgb());
            surface.fill_rect(geo.inset, border_dark.to_rgb());
        }
        RenderableTheme::Ps1 { corners, .. } => {
            surface.fill_bilinear(geo.outer, corner_quad(corners));
        }
    }
    surface.fill_rect(geo.inner, Rgb::BLACK);

    let Some(fill_rect) = geo.fill else {
        return;
    };
    let ramps: Vec<&[HexColor]> = match theme {
        RenderableTheme::Pc { ramp, .. } => vec![ramp.as_slice()],
        RenderableTheme::Ps1 { ramps, .. } => ramps.iter().map(Vec::as_slice).collect(),
    };
    if steps == 0 || ramps.iter().any(|r| r.len() != steps) {
        warn!(
            steps,
            lengths = ?ramps.iter().map(|r| r.len()).collect::<Vec<_>>(),
            "malformed ramp, skipping fill"
        );
        return;
    }
    let ramps: Vec<Vec<Rgb>> = ramps.iter().map(|r| r.iter().map(HexColor::to_rgb).collect()).collect();

    for band in bands(fill_rect, steps) {
        let i = band.index;
        let next = (i + 1).min(steps - 1);
        match ramps.as_slice() {
            [ramp] => {
                if smooth {
                    surface.fill_vertical_gradient(band.rect, ramp[i], ramp[next]);
                } else {
                    surface.fill_rect(band.rect, ramp[i]);
                }
            }
            [left, right] => {
                let top_mix = left[i].lerp(right[i], fill);
                let quad = if smooth {
                    let bottom_mix = left[next].lerp(right[next], fill);
                    Quad::new(left[i], top_mix, bottom_mix, left[next])
                } else {
                    Quad::horizontal(left[i], top_mix)
                };
                surface.fill_bilinear(band.rect, quad);
            }
            _ => {}
        }
    }
}

/// Render into a fresh `width × height` pixel buffer.
#[must_use]
pub fn render_to_buffer(
    theme: &RenderableTheme,
    fill: f64,
    smooth: bool,
    steps: usize,
    width: u32,
    height: u32,
) -> PixelBuffer {
    let mut buf = PixelBuffer::new(width, height);
    render_bar(&mut buf, theme, fill, smooth, steps);
    buf
}

fn corner_quad(corners: &Corners) -> Quad {
    Quad::new(
        corners.top_left.to_rgb(),
        corners.top_right.to_rgb(),
        corners.bottom_right.to_rgb(),
        corners.bottom_left.to_rgb(),
    )
}

// ─── Tests ───────────────────────────────────────────────────────────────────
