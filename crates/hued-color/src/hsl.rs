// SPDX-License-Identifier: MIT
//
// HSL — the space the ramp editor's hue/saturation/lightness sliders work in.
//
// Hue is in degrees, saturation and lightness in percent. Conversions use
// the textbook max/min-channel algorithm in one direction and the chroma /
// piecewise-hue reconstruction in the other.
//
// `hsl_to_rgb` accepts any real input: hue wraps modulo 360 and S/L clamp
// into 0–100 before use. That is what lets a slider delta be added
// blindly (`s + ds` may go negative) without a separate clamping pass.
//
// Round trip: for every 8-bit color, `hsl_to_rgb(rgb_to_hsl(c)) == c`.
// The f64 error in the forward conversion is orders of magnitude below
// the half-step rounding at the byte boundary.

// r, g, b, h, s, l, c, x, m are the standard names in the HSL formulas.
#![allow(clippy::many_single_char_names)]

use crate::color::{HexColor, Rgb};

// ─── Hsl ─────────────────────────────────────────────────────────────────────

/// A color in HSL space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsl {
    /// Hue angle in degrees, `0.0..360.0` when produced by [`rgb_to_hsl`].
    pub h: f64,
    /// Saturation in percent, `0.0..=100.0`.
    pub s: f64,
    /// Lightness in percent, `0.0..=100.0`.
    pub l: f64,
}

impl Hsl {
    #[inline]
    #[must_use]
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Add a delta to every component. No clamping: [`hsl_to_rgb`] does it.
    #[inline]
    #[must_use]
    pub fn shifted(self, shift: HslShift) -> Self {
        Self::new(self.h + shift.h, self.s + shift.s, self.l + shift.l)
    }

    #[must_use]
    pub fn to_rgb(self) -> Rgb {
        hsl_to_rgb(self.h, self.s, self.l)
    }
}

impl From<Rgb> for Hsl {
    fn from(rgb: Rgb) -> Self {
        rgb_to_hsl(rgb)
    }
}

// ─── HslShift ────────────────────────────────────────────────────────────────

/// A relative hue/saturation/lightness adjustment.
///
/// `h` is in degrees, `s` and `l` in percentage points. The zero shift is
/// the identity on every valid color.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HslShift {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl HslShift {
    /// No adjustment.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[inline]
    #[must_use]
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Whether all three components are exactly zero.
    #[inline]
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.h == 0.0 && self.s == 0.0 && self.l == 0.0
    }

    /// Whether all three components are finite numbers.
    #[inline]
    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.h.is_finite() && self.s.is_finite() && self.l.is_finite()
    }
}

impl std::ops::Neg for HslShift {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.h, -self.s, -self.l)
    }
}

// ─── Conversions ─────────────────────────────────────────────────────────────

/// Convert 8-bit RGB to HSL.
///
/// Grays (max channel == min channel) get `h = 0`, `s = 0`.
#[must_use]
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = f64::from(rgb.r) / 255.0;
    let g = f64::from(rgb.g) / 255.0;
    let b = f64::from(rgb.b) / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let mut h = 0.0;
    if delta != 0.0 {
        h = if max == r {
            ((g - b) / delta) % 6.0
        } else if max == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };
        h *= 60.0;
        if h < 0.0 {
            h += 360.0;
        }
    }

    let l = (max + min) / 2.0;
    let s = if delta == 0.0 {
        0.0
    } else {
        delta / (1.0 - 2.0f64.mul_add(l, -1.0).abs())
    };

    Hsl::new(h, (s * 100.0).clamp(0.0, 100.0), (l * 100.0).clamp(0.0, 100.0))
}

/// Convert HSL to 8-bit RGB.
///
/// Defined for any real input: `h` wraps modulo 360, `s` and `l` clamp to
/// `0.0..=100.0`. Non-finite inputs are treated as zero.
#[must_use]
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    let h = finite_or_zero(h).rem_euclid(360.0);
    let s = finite_or_zero(s).clamp(0.0, 100.0) / 100.0;
    let l = finite_or_zero(l).clamp(0.0, 100.0) / 100.0;

    let c = (1.0 - 2.0f64.mul_add(l, -1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    Rgb::new(to_u8(r + m), to_u8(g + m), to_u8(b + m))
}

/// Shift one color by a relative HSL delta.
///
/// The delta is added before conversion back, so clamping of S and L
/// happens once, inside [`hsl_to_rgb`]. Hue wraps.
#[must_use]
pub fn adjust_hsl(color: &HexColor, shift: HslShift) -> HexColor {
    rgb_to_hsl(color.to_rgb()).shifted(shift).to_rgb().to_hex()
}

/// [`adjust_hsl`] on a raw string; anything unparseable becomes `#000000`.
#[must_use]
pub fn adjust_hex(color: &str, shift: HslShift) -> HexColor {
    HexColor::parse(color).map_or_else(HexColor::black, |hex| adjust_hsl(&hex, shift))
}

#[inline]
const fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// Unit float to byte, rounding half up.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u8(v: f64) -> u8 {
    // Clamped before the cast, so the truncation is exact.
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

// ─── Tests ───────────────────────────────────────────────────────────────────
