//! Workspace model — session overrides layered over a loaded document.
//!
//! The loaded document (`base`) is never modified. Every change lives in
//! one of three override collections owned by [`Workspace`]:
//!
//! - **themes** — whole-theme overrides. Anything added, copied, or
//!   touched by an edit is materialized here as a full record.
//! - **legacy edits** — per-bar overrides from older sessions. Only read
//!   from persisted state; [`Workspace::migrate_legacy_edits`] folds them
//!   into `themes` once a document is loaded.
//! - **tombstones** — theme keys hidden from the resolved view.
//!
//! # Resolution
//!
//! For one key: tombstoned → absent; else the `themes` record if present,
//! else the base record, else absent; legacy edits for the key are then
//! applied bar by bar. Bar values are coerced to the theme's kind on the
//! way in, so a resolved record never holds a mismatched shape.
//!
//! For the whole workspace: base keys in base order (with overrides
//! replacing records in place), then keys that only exist in `themes`, in
//! the order they were added.
//!
//! A key is never both tombstoned and present in `themes`: adding or
//! copying a theme clears its tombstone, deleting one drops its override.
//!
//! Every operation takes `base` as a parameter. Missing keys and bars are
//! no-ops; mutating operations return whether anything changed.

use std::collections::BTreeSet;

use hued_theme::{BarValue, Document, OrderedMap, ThemeKind, ThemeRecord};
use tracing::{debug, info};

/// Per-bar legacy overrides: theme key → bar name → value.
pub type LegacyEdits = OrderedMap<OrderedMap<BarValue>>;

/// The mutable override layers of an editing session.
#[derive(Debug, Clone, PartialEq)]
pub struct Workspace {
    steps: usize,
    themes: OrderedMap<ThemeRecord>,
    edits: LegacyEdits,
    deleted: BTreeSet<String>,
}

impl Workspace {
    /// An empty workspace for ramps of `steps` colors.
    #[must_use]
    pub const fn new(steps: usize) -> Self {
        Self {
            steps,
            themes: OrderedMap::new(),
            edits: OrderedMap::new(),
            deleted: BTreeSet::new(),
        }
    }

    /// Rebuild from persisted parts. A key that is both tombstoned and
    /// overridden keeps only its tombstone.
    #[must_use]
    pub fn from_parts(
        steps: usize,
        mut themes: OrderedMap<ThemeRecord>,
        edits: LegacyEdits,
        deleted: BTreeSet<String>,
    ) -> Self {
        for key in &deleted {
            if themes.remove(key).is_some() {
                debug!(theme = %key, "dropping override for tombstoned theme");
            }
        }
        Self {
            steps,
            themes,
            edits,
            deleted,
        }
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    #[must_use]
    pub const fn steps(&self) -> usize {
        self.steps
    }

    /// Whole-theme overrides, in insertion order.
    #[must_use]
    pub const fn themes(&self) -> &OrderedMap<ThemeRecord> {
        &self.themes
    }

    #[must_use]
    pub const fn legacy_edits(&self) -> &LegacyEdits {
        &self.edits
    }

    /// Tombstoned theme keys.
    #[must_use]
    pub const fn deleted(&self) -> &BTreeSet<String> {
        &self.deleted
    }

    #[must_use]
    pub fn is_deleted(&self, key: &str) -> bool {
        self.deleted.contains(key)
    }

    /// Record a per-bar legacy override. Only persisted sessions from
    /// before whole-theme overrides produce these.
    pub fn insert_legacy_edit(&mut self, theme: impl Into<String>, bar: impl Into<String>, value: BarValue) {
        let theme = theme.into();
        self.edits.get_or_insert_with(&theme, OrderedMap::new).insert(bar, value);
    }

    // ---------------------------------------------------------------------
    // Resolution
    // ---------------------------------------------------------------------

    /// The flattened view of every visible theme. Always a fresh copy.
    #[must_use]
    pub fn resolve(&self, base: &Document) -> Document {
        let mut out = Document::new();
        for key in base.keys().chain(self.themes.keys()) {
            if out.contains_key(key) {
                continue;
            }
            if let Some(record) = self.resolve_theme(key, base) {
                out.insert(key, record);
            }
        }
        out
    }

    /// Resolve a single theme key.
    #[must_use]
    pub fn resolve_theme(&self, key: &str, base: &Document) -> Option<ThemeRecord> {
        if self.deleted.contains(key) {
            return None;
        }
        let mut record = self.themes.get(key).or_else(|| base.get(key))?.clone();
        if let Some(edits) = self.edits.get(key) {
            for (bar, value) in edits.iter() {
                record.set_bar(bar, value.clone(), self.steps);
            }
        }
        Some(record)
    }

    /// The resolved value of one bar.
    #[must_use]
    pub fn resolve_bar(&self, key: &str, bar: &str, base: &Document) -> Option<BarValue> {
        self.resolve_theme(key, base)?.bars.get(bar).cloned()
    }

    /// The override record for `key`, materializing it first if needed: a
    /// copy of the base record, or an empty PC record if the key exists
    /// nowhere. Tombstoned keys give `None`.
    pub fn ensure_editable(&mut self, key: &str, base: &Document) -> Option<&mut ThemeRecord> {
        if self.deleted.contains(key) {
            debug!(theme = %key, "theme is deleted, not editable");
            return None;
        }
        Some(
            self.themes
                .get_or_insert_with(key, || base.get(key).cloned().unwrap_or_else(ThemeRecord::placeholder)),
        )
    }

    // ---------------------------------------------------------------------
    // Theme operations
    // ---------------------------------------------------------------------

    /// Create an empty theme of `kind` under `key`, replacing any override
    /// and clearing any tombstone.
    pub fn add_theme(&mut self, key: &str, kind: ThemeKind) {
        self.deleted.remove(key);
        self.themes.insert(key, ThemeRecord::new(kind));
    }

    /// Copy the resolved `from` theme to `to`. No-op if `from` does not
    /// resolve.
    pub fn copy_theme(&mut self, from: &str, to: &str, base: &Document) -> bool {
        let Some(record) = self.resolve_theme(from, base) else {
            debug!(theme = %from, "copy source does not resolve");
            return false;
        };
        self.deleted.remove(to);
        self.themes.insert(to, record);
        true
    }

    /// Tombstone `key` and drop its override.
    pub fn delete_theme(&mut self, key: &str) -> bool {
        let newly_deleted = self.deleted.insert(key.to_string());
        let had_override = self.themes.remove(key).is_some();
        newly_deleted || had_override
    }

    /// Set the display label (`name_gs`).
    pub fn set_theme_label(&mut self, key: &str, label: &str, base: &Document) -> bool {
        let Some(record) = self.ensure_editable(key, base) else {
            return false;
        };
        record.label = Some(label.to_string());
        true
    }

    // ---------------------------------------------------------------------
    // Bar operations
    // ---------------------------------------------------------------------

    /// Store `value` for one bar, coerced to the theme's kind.
    pub fn set_bar_value(&mut self, key: &str, bar: &str, value: BarValue, base: &Document) -> bool {
        let steps = self.steps;
        let Some(record) = self.ensure_editable(key, base) else {
            return false;
        };
        record.set_bar(bar, value, steps);
        true
    }

    /// Append an all-black bar. No-op if the theme does not resolve or the
    /// name is taken.
    pub fn add_bar(&mut self, key: &str, bar: &str, base: &Document) -> bool {
        let Some(theme) = self.resolve_theme(key, base) else {
            debug!(theme = %key, "add bar: theme does not resolve");
            return false;
        };
        if theme.bars.contains_key(bar) {
            debug!(theme = %key, bar, "add bar: name taken");
            return false;
        }
        let value = BarValue::black(theme.kind(), self.steps);
        self.set_bar_value(key, bar, value, base)
    }

    /// Append a copy of bar `from` named `to`. No-op if `from` is missing or
    /// `to` is taken.
    pub fn copy_bar(&mut self, key: &str, from: &str, to: &str, base: &Document) -> bool {
        let Some(theme) = self.resolve_theme(key, base) else {
            return false;
        };
        let Some(value) = theme.bars.get(from).cloned() else {
            debug!(theme = %key, bar = from, "copy bar: source missing");
            return false;
        };
        if theme.bars.contains_key(to) {
            debug!(theme = %key, bar = to, "copy bar: name taken");
            return false;
        }
        self.set_bar_value(key, to, value, base)
    }

    /// Rename a bar in place. No-op if `from` is missing or `to` names a
    /// different existing bar.
    pub fn rename_bar(&mut self, key: &str, from: &str, to: &str, base: &Document) -> bool {
        self.rewrite_bars(key, base, |bars| {
            if from == to || !bars.contains_key(from) {
                return false;
            }
            bars.rename(from, to)
        })
    }

    /// Remove a bar, keeping the order of the rest.
    pub fn delete_bar(&mut self, key: &str, bar: &str, base: &Document) -> bool {
        self.rewrite_bars(key, base, |bars| bars.remove(bar).is_some())
    }

    /// Swap a bar with the one `delta` positions away. No-op if either
    /// position is out of range.
    pub fn move_bar(&mut self, key: &str, bar: &str, delta: isize, base: &Document) -> bool {
        self.rewrite_bars(key, base, |bars| {
            let Some(idx) = bars.position(bar) else {
                return false;
            };
            match idx.checked_add_signed(delta) {
                Some(target) if target != idx => bars.swap(idx, target),
                _ => false,
            }
        })
    }

    /// Apply `edit` to the resolved bars of `key` and, if it reports a
    /// change, store the result as the override's bars. Legacy edits for
    /// the key are part of the resolved bars, so they are dropped.
    fn rewrite_bars(
        &mut self,
        key: &str,
        base: &Document,
        edit: impl FnOnce(&mut OrderedMap<BarValue>) -> bool,
    ) -> bool {
        let Some(theme) = self.resolve_theme(key, base) else {
            debug!(theme = %key, "theme does not resolve");
            return false;
        };
        let mut bars = theme.bars;
        if !edit(&mut bars) {
            debug!(theme = %key, "bar operation changed nothing");
            return false;
        }
        self.edits.remove(key);
        let Some(record) = self.ensure_editable(key, base) else {
            return false;
        };
        record.bars = bars;
        true
    }

    // ---------------------------------------------------------------------
    // Whole-session operations
    // ---------------------------------------------------------------------

    /// Whether any override layer holds anything.
    #[must_use]
    pub fn has_any_edits(&self) -> bool {
        !self.edits.is_empty() || !self.themes.is_empty() || !self.deleted.is_empty()
    }

    /// Drop every override.
    pub fn reset_all(&mut self) {
        self.edits.clear();
        self.themes.clear();
        self.deleted.clear();
    }

    /// Fold legacy per-bar edits into theme overrides, then clear them.
    ///
    /// Edits for a theme that does not resolve are discarded. Returns the
    /// number of bar values folded in.
    pub fn migrate_legacy_edits(&mut self, base: &Document) -> usize {
        let edits = std::mem::take(&mut self.edits);
        let mut migrated = 0;
        for (key, bars) in edits {
            if bars.is_empty() {
                continue;
            }
            let resolves =
                (self.themes.contains_key(&key) || base.contains_key(&key)) && !self.deleted.contains(&key);
            if !resolves {
                debug!(theme = %key, bars = bars.len(), "discarding legacy edits for missing theme");
                continue;
            }
            for (bar, value) in bars {
                if self.set_bar_value(&key, &bar, value, base) {
                    migrated += 1;
                }
            }
        }
        if migrated > 0 {
            info!(migrated, "migrated legacy bar edits");
        }
        migrated
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
