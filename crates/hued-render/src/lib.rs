// SPDX-License-Identifier: MIT
//
// hued-render — deterministic bar renderer for the hued theme editor.
//
// Takes a `RenderableTheme` (from hued-theme), a fill fraction and a
// smooth flag, and draws the bar the way the game does: border, black
// backdrop, then one band per ramp step. Drawing goes through the
// `Surface` trait, which has exactly three primitives. `PixelBuffer` is
// the in-memory surface; `CommandList` records calls for replay or
// inspection.
//
// Same inputs, same pixels: nothing here reads a clock, a random source,
// or the environment.

pub mod bar;
pub mod commands;
pub mod geometry;
pub mod surface;

pub use bar::{Band, BarLayout, bands, clamp_fill, layout, render_bar, render_to_buffer};
pub use commands::{CommandList, DrawOp};
pub use geometry::{Quad, Rect};
pub use surface::{BILINEAR_SAMPLES, PixelBuffer, Surface, bilinear_samples, gradient_row, sample_index};
