// SPDX-License-Identifier: MIT
//
// Hex and 8-bit RGB colors — the two representations every theme stores
// and every renderer consumes.
//
// Theme documents carry colors as strings. Anything that is not exactly
// six hex digits (optionally behind a `#`) is rejected by
// `HexColor::parse`; callers that must keep going substitute black via
// `HexColor::parse_or_black`. Once parsed, a `HexColor` is always in the
// canonical lowercase `#rrggbb` form, so equality is byte equality.
//
// Interpolation happens per channel in plain sRGB bytes, with no gamma
// correction.

use std::fmt;
use std::str::FromStr;

// ─── Rgb ─────────────────────────────────────────────────────────────────────

/// An opaque 8-bit sRGB color.
///
/// # Examples
///
/// ```
/// use hued_color::Rgb;
///
/// let orange = Rgb::new(255, 128, 0);
/// assert_eq!(orange.to_hex().as_str(), "#ff8000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Pure white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from wide integer channels, clamping each into `0..=255`.
    ///
    /// This is the encoding boundary: arithmetic upstream may overshoot,
    /// the stored byte never does.
    #[must_use]
    pub fn from_clamped(r: i32, g: i32, b: i32) -> Self {
        Self::new(clamp_channel(r), clamp_channel(g), clamp_channel(b))
    }

    /// Encode as a canonical hex color.
    #[must_use]
    pub fn to_hex(self) -> HexColor {
        HexColor(format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b))
    }

    /// Linear interpolation, channel by channel, rounded to the nearest byte.
    ///
    /// `t` is clamped to `0.0..=1.0`: `t = 0.0` returns `self`,
    /// `t = 1.0` returns `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::new(
            lerp_channel(self.r, other.r, t),
            lerp_channel(self.g, other.g, t),
            lerp_channel(self.b, other.b, t),
        )
    }

    /// Channels as an array, in `r, g, b` order.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// ─── HexColor ────────────────────────────────────────────────────────────────

/// A color in canonical `#rrggbb` form (lowercase, always seven bytes).
///
/// # Examples
///
/// ```
/// use hued_color::HexColor;
///
/// let c = HexColor::parse("#C86432").unwrap();
/// assert_eq!(c.as_str(), "#c86432");
///
/// assert!(HexColor::parse("#fff").is_none());
/// assert_eq!(HexColor::parse_or_black("nope"), HexColor::black());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HexColor(String);

impl HexColor {
    /// Parse and normalize. Accepts an optional leading `#` followed by
    /// exactly six hex digits in any case; surrounding whitespace is ignored.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        normalize_hex(s)
    }

    /// Parse, substituting `#000000` for anything invalid.
    #[must_use]
    pub fn parse_or_black(s: &str) -> Self {
        normalize_hex(s).unwrap_or_else(Self::black)
    }

    /// `#000000`.
    #[must_use]
    pub fn black() -> Self {
        Self(String::from("#000000"))
    }

    /// `#ffffff`.
    #[must_use]
    pub fn white() -> Self {
        Self(String::from("#ffffff"))
    }

    /// The canonical string form.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode to 8-bit RGB. Infallible: the canonical form is validated
    /// at construction.
    #[must_use]
    pub fn to_rgb(&self) -> Rgb {
        let bytes = self.0.as_bytes();
        let channel = |i: usize| parse_hex_byte(&bytes[i..i + 2]).unwrap_or(0);
        Rgb::new(channel(1), channel(3), channel(5))
    }

    /// Interpolate toward `other` in RGB space and re-encode.
    #[must_use]
    pub fn mix(&self, other: &Self, t: f64) -> Self {
        self.to_rgb().lerp(other.to_rgb(), t).to_hex()
    }
}

impl Default for HexColor {
    /// Default is black.
    fn default() -> Self {
        Self::black()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for HexColor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Rgb> for HexColor {
    fn from(rgb: Rgb) -> Self {
        rgb.to_hex()
    }
}

impl From<&HexColor> for Rgb {
    fn from(hex: &HexColor) -> Self {
        hex.to_rgb()
    }
}

/// Error returned by [`HexColor::from_str`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidHex(pub String);

impl fmt::Display for InvalidHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid hex color {:?} (expected #rrggbb)", self.0)
    }
}

impl std::error::Error for InvalidHex {}

impl FromStr for HexColor {
    type Err = InvalidHex;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize_hex(s).ok_or_else(|| InvalidHex(s.to_string()))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for HexColor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for HexColor {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ─── Free Functions ──────────────────────────────────────────────────────────

/// Normalize a hex color string to canonical `#rrggbb`.
///
/// Returns `None` for anything that is not an optional `#` plus exactly
/// six hex digits. Never panics.
#[must_use]
pub fn normalize_hex(s: &str) -> Option<HexColor> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);
    if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    Some(HexColor(format!("#{}", s.to_ascii_lowercase())))
}

/// Decode a hex string to RGB, or `None` if it is not a valid color.
#[must_use]
pub fn hex_to_rgb(s: &str) -> Option<Rgb> {
    normalize_hex(s).map(|hex| hex.to_rgb())
}

/// Encode wide integer channels as hex, clamping each into `0..=255`.
#[must_use]
pub fn rgb_to_hex(r: i32, g: i32, b: i32) -> HexColor {
    Rgb::from_clamped(r, g, b).to_hex()
}

/// Scalar linear interpolation with `t` clamped to `0.0..=1.0`.
#[inline]
#[must_use]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    a.mul_add(1.0 - t, b * t)
}

#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lerp_channel(a: u8, b: u8, t: f64) -> u8 {
    // Clamped before the cast, so the truncation is exact.
    lerp(f64::from(a), f64::from(b), t).round().clamp(0.0, 255.0) as u8
}

#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn clamp_channel(v: i32) -> u8 {
    if v < 0 {
        0
    } else if v > 255 {
        255
    } else {
        v as u8
    }
}

#[inline]
const fn parse_hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[inline]
fn parse_hex_byte(bytes: &[u8]) -> Option<u8> {
    let hi = parse_hex_digit(bytes[0])?;
    let lo = parse_hex_digit(bytes[1])?;
    Some(hi << 4 | lo)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── Parsing ──────────────────────────────────────────────────────────

    #[test]
    fn parse_lowercases() {
        assert_eq!(HexColor::parse("#C86432").unwrap().as_str(), "#c86432");
        assert_eq!(HexColor::parse("#aBcDeF").unwrap().as_str(), "#abcdef");
    }

    #[test]
    fn parse_accepts_missing_hash_and_whitespace() {
        assert_eq!(HexColor::parse("00ff00").unwrap().as_str(), "#00ff00");
        assert_eq!(HexColor::parse("  #123456 \n").unwrap().as_str(), "#123456");
    }

    #[test]
    fn parse_rejects_other_formats() {
        for bad in ["", "#", "#fff", "#ffff", "#12345", "#1234567", "#gg0000", "##123456", "rgb(1,2,3)"] {
            assert!(HexColor::parse(bad).is_none(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn parse_or_black_substitutes() {
        assert_eq!(HexColor::parse_or_black("#12"), HexColor::black());
        assert_eq!(HexColor::parse_or_black("#FFFFFF"), HexColor::white());
    }

    #[test]
    fn from_str_reports_input() {
        let err = "zzz".parse::<HexColor>().unwrap_err();
        assert_eq!(err, InvalidHex("zzz".into()));
        assert!(err.to_string().contains("zzz"));
    }

    // ── RGB ──────────────────────────────────────────────────────────────

    #[test]
    fn hex_to_rgb_known_values() {
        assert_eq!(hex_to_rgb("#ff8000"), Some(Rgb::new(255, 128, 0)));
        assert_eq!(hex_to_rgb("#000000"), Some(Rgb::BLACK));
        assert_eq!(hex_to_rgb("#FFFFFF"), Some(Rgb::WHITE));
        assert_eq!(hex_to_rgb("#xyz"), None);
    }

    #[test]
    fn rgb_to_hex_clamps_each_channel() {
        assert_eq!(rgb_to_hex(-20, 128, 999).as_str(), "#0080ff");
        assert_eq!(rgb_to_hex(0, 0, 0).as_str(), "#000000");
        assert_eq!(rgb_to_hex(255, 255, 255).as_str(), "#ffffff");
    }

    #[test]
    fn display_matches_canonical_form() {
        assert_eq!(Rgb::new(1, 2, 255).to_string(), "#0102ff");
        assert_eq!(HexColor::parse("ABCDEF").unwrap().to_string(), "#abcdef");
    }

    // ── Interpolation ────────────────────────────────────────────────────

    #[test]
    fn lerp_endpoints() {
        let red = Rgb::new(255, 0, 0);
        let blue = Rgb::new(0, 0, 255);
        assert_eq!(red.lerp(blue, 0.0), red);
        assert_eq!(red.lerp(blue, 1.0), blue);
    }

    #[test]
    fn lerp_midpoint_rounds() {
        let a = Rgb::new(0, 0, 0);
        let b = Rgb::new(255, 101, 3);
        // 127.5 → 128, 50.5 → 51, 1.5 → 2
        assert_eq!(a.lerp(b, 0.5), Rgb::new(128, 51, 2));
    }

    #[test]
    fn lerp_clamps_t() {
        let a = Rgb::new(10, 20, 30);
        let b = Rgb::new(40, 50, 60);
        assert_eq!(a.lerp(b, -3.0), a);
        assert_eq!(a.lerp(b, 7.5), b);
    }

    #[test]
    fn mix_full_is_other() {
        let red = HexColor::parse("#ff0000").unwrap();
        let blue = HexColor::parse("#0000ff").unwrap();
        assert_eq!(red.mix(&blue, 1.0), blue);
        assert_eq!(red.mix(&blue, 0.0), red);
    }

    #[test]
    fn scalar_lerp() {
        assert!((lerp(2.0, 4.0, 0.25) - 2.5).abs() < 1e-12);
        assert!((lerp(2.0, 4.0, 2.0) - 4.0).abs() < 1e-12);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_roundtrip_is_canonical() {
        let c: HexColor = serde_json::from_str("\"#ABCDEF\"").unwrap();
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"#abcdef\"");
        assert!(serde_json::from_str::<HexColor>("\"#abc\"").is_err());
    }
}
