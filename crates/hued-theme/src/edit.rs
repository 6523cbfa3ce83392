//! Bar value edits — the two ways a draft changes a value.
//!
//! Both transforms are pure: they take a value and return a new one. The
//! draft decides which value to feed in.

use hued_color::{HexColor, HslShift, adjust_hsl};
use tracing::debug;

use crate::kind::ThemeKind;
use crate::value::{BarValue, RampSide};

/// One swatch of a bar: which ramp, which step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SwatchTarget {
    pub side: RampSide,
    pub index: usize,
}

impl SwatchTarget {
    #[must_use]
    pub const fn new(side: RampSide, index: usize) -> Self {
        Self { side, index }
    }

    /// A swatch of a PC bar (which only has the left ramp).
    #[must_use]
    pub const fn pc(index: usize) -> Self {
        Self::new(RampSide::Left, index)
    }
}

/// Shift every color of every ramp by `shift`.
#[must_use]
pub fn apply_hsl_delta(value: &BarValue, shift: HslShift) -> BarValue {
    value.map_colors(|c| adjust_hsl(c, shift))
}

/// Replace one swatch.
///
/// `current` is first conformed to `kind` (a missing or mismatched value
/// becomes an all-black default), then the swatch named by `target` is set
/// to `color`. Invalid color text writes black. An index past the end of
/// the ramp leaves the value unchanged.
#[must_use]
pub fn apply_swatch_change(
    kind: ThemeKind,
    current: Option<&BarValue>,
    steps: usize,
    target: SwatchTarget,
    color: &str,
) -> BarValue {
    let mut value = current.map_or_else(|| BarValue::black(kind, steps), |v| v.clone().conform(kind, steps));
    let color = HexColor::parse_or_black(color);

    let ramp = match (&mut value, target.side) {
        (BarValue::Pc(ramp), _) | (BarValue::Ps1 { left: ramp, .. }, RampSide::Left) => ramp,
        (BarValue::Ps1 { right: ramp, .. }, RampSide::Right) => ramp,
    };
    match ramp.get_mut(target.index) {
        Some(slot) => *slot = color,
        None => debug!(index = target.index, len = ramp.len(), "swatch index out of range"),
    }
    value
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
