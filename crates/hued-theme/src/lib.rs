//! Bar theme model for the hued editor.
//!
//! A document is an ordered map of theme key → [`ThemeRecord`]. Each record
//! has a [`ThemeKind`] (PC or PS1), border colors, and an ordered map of bar
//! name → [`BarValue`]. Bar order is display and render order.
//!
//! - [`ordered`] — the insertion-ordered map used for bars and themes
//! - [`value`] / [`record`] / [`document`] — reading and writing the tree
//! - [`projection`] — reducing a record to one drawable bar
//! - [`edit`] — HSL shift and swatch replacement

pub mod document;
pub mod edit;
pub mod kind;
pub mod ordered;
pub mod projection;
pub mod record;
pub mod value;

pub use document::{Document, DocumentError, parse_document, to_pretty_json};
pub use edit::{SwatchTarget, apply_hsl_delta, apply_swatch_change};
pub use kind::ThemeKind;
pub use ordered::OrderedMap;
pub use projection::{Corners, RenderableTheme, describe, project};
pub use record::{Borders, ThemeRecord};
pub use value::{BarValue, RampSide};

/// Default number of colors per ramp.
pub const DEFAULT_STEPS: usize = 5;
