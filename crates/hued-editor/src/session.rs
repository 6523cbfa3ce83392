//! Session snapshots — what survives a restart.
//!
//! A [`Session`] is the whole persisted editor state: the preview fill
//! level and smooth flag, the current selection, the last HSL shift, and
//! the workspace override layers. It is written as one JSON object:
//!
//! ```json
//! {
//!   "version": 2,
//!   "percent": 1.0,
//!   "smooth": false,
//!   "selected": { "sectionKey": "hp", "barName": "main" },
//!   "barAdjust": { "h": 0.0, "s": 0.0, "l": 0.0 },
//!   "edits": {},
//!   "workspaceThemes": { "hp": { "style": "pc", "colors": {} } },
//!   "deletedThemes": { "old": true }
//! }
//! ```
//!
//! Reading is forgiving: each field is checked on its own and falls back
//! to its default when missing or malformed. Unreadable text gives the
//! default session, never an error.

use std::collections::{BTreeMap, BTreeSet};

use hued_color::HslShift;
use hued_theme::{BarValue, OrderedMap, ThemeRecord};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::workspace::{LegacyEdits, Workspace};

/// Version written into every snapshot.
pub const SESSION_VERSION: u32 = 2;

/// The focused theme and bar. An empty `bar` means a theme is selected
/// without a bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    #[serde(rename = "sectionKey")]
    pub theme: String,
    #[serde(rename = "barName")]
    pub bar: String,
}

impl Selection {
    #[must_use]
    pub fn new(theme: impl Into<String>, bar: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
            bar: bar.into(),
        }
    }

    /// The bar, or `None` when only the theme is selected.
    #[must_use]
    pub fn bar(&self) -> Option<&str> {
        (!self.bar.is_empty()).then_some(self.bar.as_str())
    }
}

/// Persisted editor state.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Preview fill level. Not clamped here; the renderer clamps.
    pub percent: f64,
    pub smooth: bool,
    pub selected: Option<Selection>,
    /// Last-used HSL shift. Shown in the UI only.
    pub bar_adjust: HslShift,
    pub workspace: Workspace,
}

impl Session {
    /// Fresh state: full bar, flat bands, nothing selected, no overrides.
    #[must_use]
    pub const fn new(steps: usize) -> Self {
        Self {
            percent: 1.0,
            smooth: false,
            selected: None,
            bar_adjust: HslShift::ZERO,
            workspace: Workspace::new(steps),
        }
    }

    /// Read persisted text. Anything unreadable gives [`Session::new`].
    #[must_use]
    pub fn from_text(text: &str, steps: usize) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => Self::from_json(&value, steps),
            Err(err) => {
                warn!(error = %err, "stored session is not valid JSON, starting fresh");
                Self::new(steps)
            }
        }
    }

    /// Read a snapshot field by field.
    #[must_use]
    pub fn from_json(value: &Value, steps: usize) -> Self {
        let mut session = Self::new(steps);
        let Some(fields) = value.as_object() else {
            warn!("stored session is not an object, starting fresh");
            return session;
        };

        if let Some(percent) = fields.get("percent").and_then(Value::as_f64).filter(|p| p.is_finite()) {
            session.percent = percent;
        }
        if let Some(smooth) = fields.get("smooth").and_then(Value::as_bool) {
            session.smooth = smooth;
        }
        if let Some(shift) = fields.get("barAdjust").and_then(read_shift) {
            session.bar_adjust = shift;
        }
        session.selected = fields.get("selected").and_then(read_selection);

        let themes = fields.get("workspaceThemes").map(|v| read_themes(v, steps)).unwrap_or_default();
        let edits = fields.get("edits").map(read_edits).unwrap_or_default();
        let deleted = fields.get("deletedThemes").map(read_deleted).unwrap_or_default();
        session.workspace = Workspace::from_parts(steps, themes, edits, deleted);

        debug!(
            themes = session.workspace.themes().len(),
            deleted = session.workspace.deleted().len(),
            legacy = session.workspace.legacy_edits().len(),
            "session restored"
        );
        session
    }

    /// The snapshot as a JSON tree.
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self.snapshot()).unwrap_or(Value::Null)
    }

    /// The snapshot as compact JSON text.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.snapshot())
    }

    fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            version: SESSION_VERSION,
            percent: self.percent,
            smooth: self.smooth,
            selected: self.selected.as_ref(),
            bar_adjust: Adjust {
                h: self.bar_adjust.h,
                s: self.bar_adjust.s,
                l: self.bar_adjust.l,
            },
            edits: self.workspace.legacy_edits(),
            workspace_themes: self.workspace.themes(),
            deleted_themes: self.workspace.deleted().iter().map(|k| (k.as_str(), true)).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot<'a> {
    version: u32,
    percent: f64,
    smooth: bool,
    selected: Option<&'a Selection>,
    bar_adjust: Adjust,
    edits: &'a LegacyEdits,
    workspace_themes: &'a OrderedMap<ThemeRecord>,
    deleted_themes: BTreeMap<&'a str, bool>,
}

#[derive(Serialize)]
struct Adjust {
    h: f64,
    s: f64,
    l: f64,
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

fn read_shift(value: &Value) -> Option<HslShift> {
    let obj = value.as_object()?;
    let component = |name: &str| obj.get(name).and_then(Value::as_f64);
    let shift = HslShift::new(component("h")?, component("s")?, component("l")?);
    shift.is_finite().then_some(shift)
}

fn read_selection(value: &Value) -> Option<Selection> {
    let obj = value.as_object()?;
    let theme = obj.get("sectionKey").and_then(Value::as_str).unwrap_or_default();
    let bar = obj.get("barName").and_then(Value::as_str).unwrap_or_default();
    (!theme.is_empty()).then(|| Selection::new(theme, bar))
}

fn read_themes(value: &Value, steps: usize) -> OrderedMap<ThemeRecord> {
    let mut themes = OrderedMap::new();
    for (key, section) in object_entries(value, "workspaceThemes") {
        match ThemeRecord::from_json(section, steps) {
            Some(record) => {
                themes.insert(key.clone(), record);
            }
            None => warn!(theme = %key, "ignoring malformed stored theme"),
        }
    }
    themes
}

fn read_edits(value: &Value) -> LegacyEdits {
    let mut edits = LegacyEdits::new();
    for (key, bars) in object_entries(value, "edits") {
        let mut theme_edits = OrderedMap::new();
        for (bar, raw) in object_entries(bars, "edits entry") {
            match BarValue::from_json(raw) {
                Some(v) => {
                    theme_edits.insert(bar.clone(), v);
                }
                None => warn!(theme = %key, bar = %bar, "ignoring malformed stored bar edit"),
            }
        }
        if !theme_edits.is_empty() {
            edits.insert(key.clone(), theme_edits);
        }
    }
    edits
}

/// Tombstones are stored as `{ key: true }`; anything but `false` or
/// `null` counts as set.
fn read_deleted(value: &Value) -> BTreeSet<String> {
    object_entries(value, "deletedThemes")
        .filter(|(_, flag)| !matches!(flag, Value::Null | Value::Bool(false)))
        .map(|(k, _)| k.clone())
        .collect()
}

fn object_entries<'a>(value: &'a Value, what: &'static str) -> impl Iterator<Item = (&'a String, &'a Value)> {
    let map: Option<&Map<String, Value>> = value.as_object();
    if map.is_none() && !value.is_null() {
        warn!(field = what, "expected an object, ignoring");
    }
    map.into_iter().flatten()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use hued_color::HexColor;
    use hued_theme::{Document, ThemeKind, parse_document};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn defaults() {
        let s = Session::new(5);
        assert_eq!(s.percent, 1.0);
        assert!(!s.smooth);
        assert_eq!(s.selected, None);
        assert_eq!(s.bar_adjust, HslShift::ZERO);
        assert!(!s.workspace.has_any_edits());
    }

    #[test]
    fn garbage_text_gives_defaults() {
        assert_eq!(Session::from_text("{not json", 5), Session::new(5));
        assert_eq!(Session::from_text("[1,2,3]", 5), Session::new(5));
    }

    #[test]
    fn fields_validate_independently() {
        let s = Session::from_json(
            &json!({
                "percent": "high",
                "smooth": true,
                "barAdjust": { "h": 10, "s": "x", "l": 0 },
                "selected": { "sectionKey": "hp", "barName": "" },
                "workspaceThemes": 7,
                "deletedThemes": { "gone": true, "kept": false },
            }),
            5,
        );
        assert_eq!(s.percent, 1.0);
        assert!(s.smooth);
        assert_eq!(s.bar_adjust, HslShift::ZERO);
        assert_eq!(s.selected, Some(Selection::new("hp", "")));
        assert_eq!(s.selected.as_ref().and_then(Selection::bar), None);
        assert!(s.workspace.themes().is_empty());
        assert!(s.workspace.is_deleted("gone"));
        assert!(!s.workspace.is_deleted("kept"));
    }

    #[test]
    fn selection_needs_a_theme() {
        let s = Session::from_json(&json!({ "selected": { "sectionKey": "", "barName": "x" } }), 5);
        assert_eq!(s.selected, None);
    }

    #[test]
    fn round_trips_through_text() {
        let mut s = Session::new(1);
        s.percent = 0.25;
        s.smooth = true;
        s.selected = Some(Selection::new("A", "x"));
        s.bar_adjust = HslShift::new(15.0, -5.0, 2.5);
        let base: Document = parse_document(&json!({ "A": { "colors": { "x": ["#010101"] } } }), 1).unwrap();
        s.workspace
            .set_bar_value("A", "x", BarValue::Pc(vec![HexColor::white()]), &base);
        s.workspace.add_theme("N", ThemeKind::Ps1);
        s.workspace.delete_theme("old");
        s.workspace
            .insert_legacy_edit("Q", "y", BarValue::Pc(vec![HexColor::black()]));

        let text = s.to_text().unwrap();
        assert_eq!(Session::from_text(&text, 1), s);
    }

    #[test]
    fn snapshot_shape() {
        let mut s = Session::new(1);
        s.workspace.delete_theme("old");
        let v = s.to_json();
        assert_eq!(v["version"], json!(2));
        assert_eq!(v["deletedThemes"], json!({ "old": true }));
        assert_eq!(v["selected"], Value::Null);
        assert_eq!(v["barAdjust"], json!({ "h": 0.0, "s": 0.0, "l": 0.0 }));
        assert_eq!(v["edits"], json!({}));
    }

    #[test]
    fn legacy_edits_are_read() {
        let s = Session::from_json(
            &json!({ "edits": { "A": { "x": ["#111111"], "bad": 3 }, "B": {} } }),
            1,
        );
        let edits = s.workspace.legacy_edits();
        assert_eq!(edits.keys().collect::<Vec<_>>(), ["A"]);
        assert_eq!(edits.get("A").unwrap().keys().collect::<Vec<_>>(), ["x"]);
    }
}
