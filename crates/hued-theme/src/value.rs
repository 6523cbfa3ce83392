//! Bar values — the color ramps one bar is drawn from.
//!
//! A PC bar is a single ramp; a PS1 bar is a left/right pair of ramps.
//! Index 0 of a ramp is the bottom step, index N-1 the top.
//!
//! The document stores these as bare JSON arrays and tells them apart only
//! by nesting. [`BarValue::from_json`] reads the shape once; everything
//! downstream matches on the variant. [`BarValue::conform`] is the single
//! place a value whose shape disagrees with its theme's kind is replaced.

use hued_color::HexColor;
use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::Value;
use tracing::{debug, warn};

use crate::kind::ThemeKind;

/// Which ramp of a PS1 bar an edit targets. PC bars only have `Left`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RampSide {
    #[default]
    Left,
    Right,
}

impl RampSide {
    /// Map the document's ramp index (`0` left, `1` right). Anything else
    /// is treated as left.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        if index == 1 { Self::Right } else { Self::Left }
    }
}

/// The color content of one bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BarValue {
    /// A single ramp.
    Pc(Vec<HexColor>),
    /// Left and right ramps.
    Ps1 {
        left: Vec<HexColor>,
        right: Vec<HexColor>,
    },
}

impl BarValue {
    /// All-black value of the right shape for `kind`, `steps` colors per ramp.
    #[must_use]
    pub fn black(kind: ThemeKind, steps: usize) -> Self {
        let ramp = vec![HexColor::black(); steps];
        match kind {
            ThemeKind::Pc => Self::Pc(ramp),
            ThemeKind::Ps1 => Self::Ps1 {
                left: ramp.clone(),
                right: ramp,
            },
        }
    }

    /// The kind whose shape this value has.
    #[must_use]
    pub const fn kind(&self) -> ThemeKind {
        match self {
            Self::Pc(_) => ThemeKind::Pc,
            Self::Ps1 { .. } => ThemeKind::Ps1,
        }
    }

    #[must_use]
    pub const fn matches(&self, kind: ThemeKind) -> bool {
        matches!(
            (self, kind),
            (Self::Pc(_), ThemeKind::Pc) | (Self::Ps1 { .. }, ThemeKind::Ps1)
        )
    }

    /// Return `self` if its shape fits `kind`, otherwise an all-black default
    /// of the right shape. Never propagates a mismatched shape.
    #[must_use]
    pub fn conform(self, kind: ThemeKind, steps: usize) -> Self {
        if self.matches(kind) {
            self
        } else {
            warn!(expected = %kind, found = %self.kind(), "bar value shape mismatch, using black default");
            Self::black(kind, steps)
        }
    }

    /// Ramps in order: one for PC, left then right for PS1.
    #[must_use]
    pub fn ramps(&self) -> Vec<&[HexColor]> {
        match self {
            Self::Pc(ramp) => vec![ramp.as_slice()],
            Self::Ps1 { left, right } => vec![left.as_slice(), right.as_slice()],
        }
    }

    /// Apply `f` to every color of every ramp, keeping the shape.
    #[must_use]
    pub fn map_colors(&self, mut f: impl FnMut(&HexColor) -> HexColor) -> Self {
        match self {
            Self::Pc(ramp) => Self::Pc(ramp.iter().map(&mut f).collect()),
            Self::Ps1 { left, right } => Self::Ps1 {
                left: left.iter().map(&mut f).collect(),
                right: right.iter().map(&mut f).collect(),
            },
        }
    }

    /// Read a document value.
    ///
    /// An array whose first two elements are themselves arrays is a PS1
    /// pair; any other array is a PC ramp. Non-arrays give `None`.
    /// Colors that are not valid hex (including non-strings) become black.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        let items = value.as_array()?;
        if let [Value::Array(left), Value::Array(right), ..] = items.as_slice() {
            return Some(Self::Ps1 {
                left: ramp_from_json(left),
                right: ramp_from_json(right),
            });
        }
        Some(Self::Pc(ramp_from_json(items)))
    }

    /// Read a document value and force it into `kind`'s shape.
    #[must_use]
    pub fn from_json_for(value: &Value, kind: ThemeKind, steps: usize) -> Self {
        Self::from_json(value).map_or_else(
            || {
                warn!(expected = %kind, "bar value is not an array, using black default");
                Self::black(kind, steps)
            },
            |v| v.conform(kind, steps),
        )
    }
}

fn ramp_from_json(items: &[Value]) -> Vec<HexColor> {
    items
        .iter()
        .map(|item| {
            let parsed = item.as_str().and_then(HexColor::parse);
            parsed.unwrap_or_else(|| {
                debug!(value = %item, "invalid color in ramp, using #000000");
                HexColor::black()
            })
        })
        .collect()
}

impl Serialize for BarValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Pc(ramp) => ramp.serialize(serializer),
            Self::Ps1 { left, right } => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element(left)?;
                seq.serialize_element(right)?;
                seq.end()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
