//! Theme records — one section of the bar document.
//!
//! A record is what a document section becomes after reading: its kind,
//! its border colors, its bars in order, and whatever else the section
//! carried. Fields this crate does not interpret (`scale`, unknown keys,
//! border fields belonging to the other kind) are kept verbatim so export
//! writes them back unchanged.

use hued_color::HexColor;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::kind::ThemeKind;
use crate::ordered::OrderedMap;
use crate::value::BarValue;

const STYLE: &str = "style";
const COLORS: &str = "colors";
const LABEL: &str = "name_gs";
const SCALE: &str = "scale";

const BORDER_LIGHT: &str = "border_light";
const BORDER_DARK: &str = "border_dark";
const BORDER_TL: &str = "border_tl";
const BORDER_TR: &str = "border_tr";
const BORDER_BR: &str = "border_br";
const BORDER_BL: &str = "border_bl";

// ---------------------------------------------------------------------------
// Borders
// ---------------------------------------------------------------------------

/// Border colors, shaped by the theme kind.
///
/// Fields are optional because documents may omit them; projection fills
/// the gaps with defaults. An omitted field stays omitted on export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Borders {
    Pc {
        light: Option<HexColor>,
        dark: Option<HexColor>,
    },
    Ps1 {
        top_left: Option<HexColor>,
        top_right: Option<HexColor>,
        bottom_right: Option<HexColor>,
        bottom_left: Option<HexColor>,
    },
}

impl Borders {
    /// Border set with every field omitted.
    #[must_use]
    pub const fn empty(kind: ThemeKind) -> Self {
        match kind {
            ThemeKind::Pc => Self::Pc {
                light: None,
                dark: None,
            },
            ThemeKind::Ps1 => Self::Ps1 {
                top_left: None,
                top_right: None,
                bottom_right: None,
                bottom_left: None,
            },
        }
    }

    /// The explicit defaults a freshly added theme is created with.
    #[must_use]
    pub fn initial(kind: ThemeKind) -> Self {
        match kind {
            ThemeKind::Pc => Self::Pc {
                light: Some(HexColor::white()),
                dark: HexColor::parse("#404040"),
            },
            ThemeKind::Ps1 => Self::Ps1 {
                top_left: Some(HexColor::black()),
                top_right: Some(HexColor::black()),
                bottom_right: Some(HexColor::black()),
                bottom_left: Some(HexColor::black()),
            },
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ThemeKind {
        match self {
            Self::Pc { .. } => ThemeKind::Pc,
            Self::Ps1 { .. } => ThemeKind::Ps1,
        }
    }

    /// Document field names paired with their values, in export order.
    fn fields(&self) -> Vec<(&'static str, Option<&HexColor>)> {
        match self {
            Self::Pc { light, dark } => vec![(BORDER_LIGHT, light.as_ref()), (BORDER_DARK, dark.as_ref())],
            Self::Ps1 {
                top_left,
                top_right,
                bottom_right,
                bottom_left,
            } => vec![
                (BORDER_TL, top_left.as_ref()),
                (BORDER_TR, top_right.as_ref()),
                (BORDER_BR, bottom_right.as_ref()),
                (BORDER_BL, bottom_left.as_ref()),
            ],
        }
    }

    /// Take this kind's border fields out of a section object.
    fn take_from(kind: ThemeKind, section: &mut Map<String, Value>) -> Self {
        let mut take = |name: &str| section.remove(name).and_then(|v| border_color(&v));
        match kind {
            ThemeKind::Pc => Self::Pc {
                light: take(BORDER_LIGHT),
                dark: take(BORDER_DARK),
            },
            ThemeKind::Ps1 => Self::Ps1 {
                top_left: take(BORDER_TL),
                top_right: take(BORDER_TR),
                bottom_right: take(BORDER_BR),
                bottom_left: take(BORDER_BL),
            },
        }
    }
}

/// A non-empty string is a border color (invalid text reads as black);
/// anything else counts as omitted.
fn border_color(value: &Value) -> Option<HexColor> {
    match value.as_str() {
        Some(s) if !s.is_empty() => Some(HexColor::parse_or_black(s)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// ThemeRecord
// ---------------------------------------------------------------------------

/// One theme: kind, borders, ordered bars, and passthrough fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeRecord {
    pub borders: Borders,
    /// Bars in display/render order.
    pub bars: OrderedMap<BarValue>,
    /// Optional display label (`name_gs`).
    pub label: Option<String>,
    /// Passthrough `scale`; not interpreted.
    pub scale: Option<Value>,
    /// Every other field of the section, in document order.
    pub extra: Map<String, Value>,
}

impl ThemeRecord {
    /// A new, empty theme as created by "add theme": explicit default
    /// borders, `scale = 1.0`, no bars.
    #[must_use]
    pub fn new(kind: ThemeKind) -> Self {
        Self {
            borders: Borders::initial(kind),
            bars: OrderedMap::new(),
            label: None,
            scale: Some(Value::from(1.0)),
            extra: Map::new(),
        }
    }

    /// The bare placeholder used when an edit targets a key that exists
    /// nowhere: PC, nothing set.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            borders: Borders::empty(ThemeKind::Pc),
            bars: OrderedMap::new(),
            label: None,
            scale: None,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ThemeKind {
        self.borders.kind()
    }

    /// Store a bar value, coercing its shape to this theme's kind.
    pub fn set_bar(&mut self, name: impl Into<String>, value: BarValue, steps: usize) {
        let kind = self.kind();
        self.bars.insert(name, value.conform(kind, steps));
    }

    /// Read one document section. Returns `None` if `section` is not an
    /// object. Bar values are coerced to the section's kind.
    #[must_use]
    pub fn from_json(section: &Value, steps: usize) -> Option<Self> {
        let mut fields = section.as_object()?.clone();

        let kind = fields
            .remove(STYLE)
            .as_ref()
            .and_then(Value::as_str)
            .map_or(ThemeKind::Pc, ThemeKind::from_style);
        let borders = Borders::take_from(kind, &mut fields);

        let label = match fields.remove(LABEL) {
            Some(Value::String(s)) => Some(s),
            Some(other) => {
                fields.insert(LABEL.to_string(), other);
                None
            }
            None => None,
        };
        let scale = fields.remove(SCALE);

        let mut bars = OrderedMap::new();
        if let Some(Value::Object(colors)) = fields.remove(COLORS) {
            for (name, value) in &colors {
                bars.insert(name.clone(), BarValue::from_json_for(value, kind, steps));
            }
        }

        Some(Self {
            borders,
            bars,
            label,
            scale,
            extra: fields,
        })
    }

    /// Render back to a document section.
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Default for ThemeRecord {
    fn default() -> Self {
        Self::placeholder()
    }
}

impl Serialize for ThemeRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(scale) = &self.scale {
            map.serialize_entry(SCALE, scale)?;
        }
        map.serialize_entry(STYLE, self.kind().as_style())?;
        if let Some(label) = &self.label {
            map.serialize_entry(LABEL, label)?;
        }
        for (name, color) in self.borders.fields() {
            if let Some(color) = color {
                map.serialize_entry(name, color)?;
            }
        }
        for (k, v) in &self.extra {
            map.serialize_entry(k, v)?;
        }
        map.serialize_entry(COLORS, &self.bars)?;
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
