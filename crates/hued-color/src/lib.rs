// SPDX-License-Identifier: MIT
//
// hued-color — color math for the hued bar theme editor.
//
// Everything a bar theme needs to say about color fits in three shapes:
// the canonical `#rrggbb` string the document stores, the 8-bit RGB the
// renderer paints, and the HSL triple the adjustment sliders move. This
// crate converts between them. It holds no state and never fails: bad
// input degrades to black instead of erroring.

pub mod color;
pub mod hsl;

pub use color::{HexColor, InvalidHex, Rgb, hex_to_rgb, lerp, normalize_hex, rgb_to_hex};
pub use hsl::{Hsl, HslShift, adjust_hex, adjust_hsl, hsl_to_rgb, rgb_to_hsl};
