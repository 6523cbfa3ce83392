//! The editor controller.
//!
//! [`Editor`] owns everything a front end needs: the loaded base document,
//! the persisted [`Session`], the single active [`Draft`], and the session
//! store. Every operation keeps three rules:
//!
//! - the base document is never modified;
//! - before focus leaves a dirty draft, the conflict resolver decides
//!   whether to commit or discard it;
//! - after any change the session is written to the store.
//!
//! Operations on themes or bars that do not exist are no-ops and report
//! `false`.

use hued_color::HslShift;
use hued_render::{PixelBuffer, render_to_buffer};
use hued_theme::{
    Document, DocumentError, RenderableTheme, SwatchTarget, ThemeKind, apply_swatch_change, describe, project,
    to_pretty_json,
};
use tracing::{debug, info, warn};

use crate::config::EditorConfig;
use crate::draft::{ConflictChoice, Draft, DraftError, DraftSlot};
use crate::load::{LoadError, load_document};
use crate::persistence::Persistence;
use crate::session::{Selection, Session};
use crate::workspace::Workspace;

/// Decides what happens to a dirty draft when focus moves away.
pub type ConflictResolver = Box<dyn FnMut(&Draft) -> ConflictChoice>;

/// The editor state machine.
pub struct Editor {
    config: EditorConfig,
    base: Document,
    loaded: bool,
    session: Session,
    draft: DraftSlot,
    persistence: Persistence,
    resolver: ConflictResolver,
}

impl Editor {
    /// Build an editor, restoring whatever session `persistence` holds.
    /// No document is loaded yet. Dirty drafts are committed on focus
    /// change until another resolver is installed.
    #[must_use]
    pub fn new(config: EditorConfig, persistence: Persistence) -> Self {
        let steps = config.steps;
        let session = persistence
            .load()
            .map_or_else(|| Session::new(steps), |text| Session::from_text(&text, steps));
        Self {
            config,
            base: Document::new(),
            loaded: false,
            session,
            draft: DraftSlot::new(),
            persistence,
            resolver: Box::new(|_: &Draft| ConflictChoice::Commit),
        }
    }

    /// Replace the conflict resolver.
    pub fn set_conflict_resolver(&mut self, resolver: impl FnMut(&Draft) -> ConflictChoice + 'static) {
        self.resolver = Box::new(resolver);
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[must_use]
    pub const fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[must_use]
    pub const fn steps(&self) -> usize {
        self.config.steps
    }

    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The loaded document, unmodified.
    #[must_use]
    pub const fn base(&self) -> &Document {
        &self.base
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub const fn workspace(&self) -> &Workspace {
        &self.session.workspace
    }

    #[must_use]
    pub const fn selection(&self) -> Option<&Selection> {
        self.session.selected.as_ref()
    }

    #[must_use]
    pub const fn draft(&self) -> Option<&Draft> {
        self.draft.active()
    }

    #[must_use]
    pub const fn is_persistence_degraded(&self) -> bool {
        self.persistence.is_degraded()
    }

    /// The workspace view: base plus every committed change.
    #[must_use]
    pub fn resolved(&self) -> Document {
        self.session.workspace.resolve(&self.base)
    }

    /// Theme keys in display order.
    #[must_use]
    pub fn theme_keys(&self) -> Vec<String> {
        self.resolved().keys().map(str::to_string).collect()
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Parse relaxed document text and make it the base. On error nothing
    /// changes.
    ///
    /// # Errors
    ///
    /// Any [`LoadError`] from parsing.
    pub fn load_document_text(&mut self, text: &str) -> Result<(), LoadError> {
        let doc = load_document(text, self.steps())?;
        self.load_document(doc);
        Ok(())
    }

    /// Make `doc` the base, fold old per-bar edits into it, and reopen a
    /// draft on the restored selection.
    pub fn load_document(&mut self, doc: Document) {
        self.base = doc;
        self.loaded = true;
        let migrated = self.session.workspace.migrate_legacy_edits(&self.base);
        if migrated > 0 {
            info!(migrated, "folded legacy bar edits into workspace themes");
        }
        self.restart_draft();
        self.persist();
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    /// Focus `key`, landing on its first bar if it has one. `false` if the
    /// theme does not resolve.
    pub fn select_theme(&mut self, key: &str) -> bool {
        let Some(theme) = self.session.workspace.resolve_theme(key, &self.base) else {
            debug!(theme = key, "select: no such theme");
            return false;
        };
        let first = theme.bars.keys().next().map(str::to_string).unwrap_or_default();
        self.settle(Some((key, Some(first.as_str()))));
        self.focus(key, &first);
        self.persist();
        true
    }

    /// Focus `key.bar` and open a draft on it. Re-selecting the bar the
    /// active draft already edits keeps the draft. Returns whether a draft
    /// is active afterwards.
    pub fn select_bar(&mut self, key: &str, bar: &str) -> bool {
        self.settle(Some((key, Some(bar))));
        self.focus(key, bar);
        self.persist();
        self.draft.active().is_some()
    }

    /// Drop the focus and any draft.
    pub fn clear_selection(&mut self) {
        self.settle(None);
        self.session.selected = None;
        self.draft.cancel();
        self.persist();
    }

    // -----------------------------------------------------------------------
    // Theme operations
    // -----------------------------------------------------------------------

    /// Create an empty theme and select it. A blank `label` defaults to
    /// the key.
    pub fn add_theme(&mut self, key: &str, kind: ThemeKind, label: Option<&str>) {
        // The theme is replaced wholesale, so a draft anywhere is left behind.
        self.settle(None);
        self.session.workspace.add_theme(key, kind);
        let label = label.map(str::trim).filter(|l| !l.is_empty()).unwrap_or(key);
        self.session.workspace.set_theme_label(key, label, &self.base);
        self.focus(key, "");
        self.persist();
    }

    pub fn set_theme_label(&mut self, key: &str, label: &str) -> bool {
        let changed = self.session.workspace.set_theme_label(key, label, &self.base);
        if changed {
            self.persist();
        }
        changed
    }

    /// Copy `from` to `to` (overwriting) and select the copy.
    pub fn copy_theme(&mut self, from: &str, to: &str) -> bool {
        if self.session.workspace.resolve_theme(from, &self.base).is_none() {
            debug!(from, "copy: no such theme");
            return false;
        }
        self.settle(None);
        if !self.session.workspace.copy_theme(from, to, &self.base) {
            return false;
        }
        self.focus_first_bar(to);
        self.persist();
        true
    }

    /// Copy then delete. Refused when the names match, when `to` already
    /// exists, or when `from` does not.
    pub fn rename_theme(&mut self, from: &str, to: &str) -> bool {
        let ws = &self.session.workspace;
        if from == to
            || ws.resolve_theme(to, &self.base).is_some()
            || ws.resolve_theme(from, &self.base).is_none()
        {
            debug!(from, to, "rename theme refused");
            return false;
        }
        self.copy_theme(from, to) && self.delete_theme(from)
    }

    /// Tombstone `key`. A draft or selection inside it is dropped without
    /// asking.
    pub fn delete_theme(&mut self, key: &str) -> bool {
        if self.draft.active().is_some_and(|d| d.theme() == key) {
            self.draft.cancel();
        }
        if self.selection().is_some_and(|s| s.theme == key) {
            self.session.selected = None;
        }
        let changed = self.session.workspace.delete_theme(key);
        self.persist();
        changed
    }

    // -----------------------------------------------------------------------
    // Bar operations
    // -----------------------------------------------------------------------

    /// Append an all-black bar and select it.
    pub fn add_bar(&mut self, key: &str, bar: &str) -> bool {
        self.settle(Some((key, Some(bar))));
        if !self.session.workspace.add_bar(key, bar, &self.base) {
            return false;
        }
        self.focus(key, bar);
        self.persist();
        true
    }

    /// Duplicate `from` as `to` and select the copy.
    pub fn copy_bar(&mut self, key: &str, from: &str, to: &str) -> bool {
        self.settle(Some((key, Some(to))));
        if !self.session.workspace.copy_bar(key, from, to, &self.base) {
            return false;
        }
        self.focus(key, to);
        self.persist();
        true
    }

    /// Rename a bar in place and select it under its new name.
    pub fn rename_bar(&mut self, key: &str, from: &str, to: &str) -> bool {
        self.settle(Some((key, Some(to))));
        if !self.session.workspace.rename_bar(key, from, to, &self.base) {
            return false;
        }
        self.focus(key, to);
        self.persist();
        true
    }

    /// Remove a bar. Focus moves to the first remaining bar, or to the
    /// bare theme when none is left. A draft on the removed bar is
    /// dropped without asking.
    pub fn delete_bar(&mut self, key: &str, bar: &str) -> bool {
        let Some(theme) = self.session.workspace.resolve_theme(key, &self.base) else {
            return false;
        };
        if !theme.bars.contains_key(bar) {
            debug!(theme = key, bar, "delete: no such bar");
            return false;
        }
        let next = theme.bars.keys().find(|name| *name != bar).map(str::to_string).unwrap_or_default();

        if self.draft.active().is_some_and(|d| d.targets(key, bar)) {
            self.draft.cancel();
        } else {
            self.settle(Some((key, Some(next.as_str()))));
        }
        self.session.workspace.delete_bar(key, bar, &self.base);
        self.focus(key, &next);
        self.persist();
        true
    }

    /// Swap a bar with its neighbour `delta` places away and keep it
    /// selected.
    pub fn move_bar(&mut self, key: &str, bar: &str, delta: isize) -> bool {
        self.settle(Some((key, Some(bar))));
        if !self.session.workspace.move_bar(key, bar, delta, &self.base) {
            return false;
        }
        self.focus(key, bar);
        self.persist();
        true
    }

    // -----------------------------------------------------------------------
    // Draft editing
    // -----------------------------------------------------------------------

    /// Set one swatch of `key.bar` in the draft, opening a draft on that
    /// bar first if needed. `false` if the bar does not resolve.
    pub fn edit_swatch(&mut self, key: &str, bar: &str, target: SwatchTarget, color: &str) -> bool {
        let Some(kind) = self.session.workspace.resolve_theme(key, &self.base).map(|t| t.kind()) else {
            return false;
        };
        if !self.draft.active().is_some_and(|d| d.targets(key, bar)) {
            self.settle(Some((key, Some(bar))));
            let resolved = self.resolved();
            if !self.draft.start(key, bar, &resolved) {
                return false;
            }
        }
        let steps = self.steps();
        let Some(draft) = self.draft.active_mut() else {
            return false;
        };
        let value = apply_swatch_change(kind, Some(draft.current()), steps, target, color);
        draft.set_value(value);
        true
    }

    /// Shift the selected bar by `shift`, measured from the draft's start
    /// snapshot. `false` without a selected bar.
    pub fn edit_hsl(&mut self, shift: HslShift) -> bool {
        let Some((key, bar)) = self.selected_bar() else {
            return false;
        };
        if !self.draft.active().is_some_and(|d| d.targets(&key, &bar)) {
            let resolved = self.resolved();
            if !self.draft.start(&key, &bar, &resolved) {
                return false;
            }
        }
        let Some(draft) = self.draft.active_mut() else {
            return false;
        };
        draft.set_hsl(shift);
        self.session.bar_adjust = shift;
        self.persist();
        true
    }

    /// Throw away draft edits but keep the draft open.
    pub fn reset_draft(&mut self) {
        if let Some(draft) = self.draft.active_mut() {
            draft.reset();
        }
    }

    /// Write the draft into the workspace and select its bar.
    ///
    /// # Errors
    ///
    /// [`DraftError`] if there is no draft or the workspace refuses it.
    pub fn confirm_draft(&mut self) -> Result<(), DraftError> {
        let draft = self.draft.confirm(&mut self.session.workspace, &self.base)?;
        self.session.selected = Some(Selection::new(draft.theme(), draft.bar()));
        self.persist();
        Ok(())
    }

    pub fn cancel_draft(&mut self) {
        self.draft.cancel();
    }

    // -----------------------------------------------------------------------
    // Display
    // -----------------------------------------------------------------------

    pub fn set_percent(&mut self, percent: f64) {
        self.session.percent = percent;
        self.persist();
    }

    pub fn set_smooth(&mut self, smooth: bool) {
        self.session.smooth = smooth;
        self.persist();
    }

    /// The resolved document with the active draft's value laid over it.
    #[must_use]
    pub fn display_document(&self) -> Document {
        let mut doc = self.resolved();
        if let Some(draft) = self.draft.active() {
            if let Some(record) = doc.get_mut(draft.theme()) {
                record.set_bar(draft.bar(), draft.current().clone(), self.steps());
            }
        }
        doc
    }

    /// Drawing input for `key.bar`, draft included.
    #[must_use]
    pub fn renderable(&self, key: &str, bar: &str) -> Option<RenderableTheme> {
        let doc = self.display_document();
        let record = doc.get(key)?;
        let value = record.bars.get(bar)?;
        Some(project(record, Some(value), self.steps()))
    }

    /// Tooltip text for `key.bar`.
    #[must_use]
    pub fn describe(&self, key: &str, bar: &str) -> Option<String> {
        self.renderable(key, bar).map(|theme| describe(bar, &theme))
    }

    /// Render `key.bar` at the session's fill level and smooth setting.
    #[must_use]
    pub fn render(&self, key: &str, bar: &str, width: u32, height: u32) -> Option<PixelBuffer> {
        let theme = self.renderable(key, bar)?;
        Some(render_to_buffer(
            &theme,
            self.session.percent,
            self.session.smooth,
            self.steps(),
            width,
            height,
        ))
    }

    /// Render the selected bar at the configured preview size.
    #[must_use]
    pub fn preview(&self) -> Option<PixelBuffer> {
        let (key, bar) = self.selected_bar()?;
        self.render(&key, &bar, self.config.preview_width, self.config.preview_height)
    }

    // -----------------------------------------------------------------------
    // Whole session
    // -----------------------------------------------------------------------

    /// The resolved document as pretty JSON. Uncommitted draft edits are
    /// not included.
    ///
    /// # Errors
    ///
    /// Serializer failures.
    pub fn export_json(&self) -> Result<String, DocumentError> {
        to_pretty_json(&self.resolved())
    }

    #[must_use]
    pub fn has_any_edits(&self) -> bool {
        self.session.workspace.has_any_edits()
    }

    /// Forget every workspace change and reopen the draft on the base
    /// value. `false` if there was nothing to reset.
    pub fn reset_all(&mut self) -> bool {
        if !self.has_any_edits() {
            return false;
        }
        self.session.workspace.reset_all();
        self.restart_draft();
        self.persist();
        true
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn selected_bar(&self) -> Option<(String, String)> {
        let sel = self.selection()?;
        sel.bar().map(|bar| (sel.theme.clone(), bar.to_string()))
    }

    fn settle(&mut self, next: Option<(&str, Option<&str>)>) {
        let resolver = &mut self.resolver;
        let result = self
            .draft
            .settle_before_switch(next, &mut self.session.workspace, &self.base, |d| resolver(d));
        if let Err(err) = result {
            warn!(error = %err, "could not commit draft, discarding it");
            self.draft.cancel();
        }
    }

    /// Select `key.bar` (empty `bar` for the bare theme), zero the shown
    /// HSL shift, and open a draft unless one already edits that bar.
    fn focus(&mut self, key: &str, bar: &str) {
        self.session.selected = Some(Selection::new(key, bar));
        self.session.bar_adjust = HslShift::ZERO;
        if self.draft.active().is_some_and(|d| d.targets(key, bar)) {
            return;
        }
        if bar.is_empty() {
            self.draft.cancel();
        } else {
            let resolved = self.resolved();
            self.draft.start(key, bar, &resolved);
        }
    }

    fn focus_first_bar(&mut self, key: &str) {
        let first = self
            .session
            .workspace
            .resolve_theme(key, &self.base)
            .and_then(|t| t.bars.keys().next().map(str::to_string))
            .unwrap_or_default();
        self.focus(key, &first);
    }

    fn restart_draft(&mut self) {
        match self.selected_bar() {
            Some((key, bar)) => {
                let resolved = self.resolved();
                self.draft.start(&key, &bar, &resolved);
            }
            None => {
                self.draft.cancel();
            }
        }
    }

    fn persist(&mut self) {
        match self.session.to_text() {
            Ok(text) => self.persistence.save(&text),
            Err(err) => warn!(error = %err, "could not serialize session"),
        }
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("config", &self.config)
            .field("loaded", &self.loaded)
            .field("session", &self.session)
            .field("draft", &self.draft)
            .field("persistence", &self.persistence)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use hued_color::{HexColor, Rgb};
    use hued_theme::{BarValue, RampSide};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::rc::Rc;

    const DOC: &str = r##"{
        // two themes
        "A": {
            "style": "pc",
            "colors": {
                "x": ["#ff0000", "#00ff00"],
                "y": ["#0000ff", "#ffffff"],
            },
        },
        "B": {
            "style": "ps1",
            "colors": { "z": [["#000000", "#000000"], ["#ffffff", "#ffffff"]] },
        },
    }"##;

    fn hex(s: &str) -> HexColor {
        HexColor::parse(s).unwrap()
    }

    fn editor() -> Editor {
        let config = EditorConfig {
            steps: 2,
            preview_width: 20,
            preview_height: 6,
            ..EditorConfig::default()
        };
        let mut ed = Editor::new(config, Persistence::memory());
        ed.load_document_text(DOC).unwrap();
        ed
    }

    fn bar_keys(ed: &Editor, key: &str) -> Vec<String> {
        ed.resolved().get(key).unwrap().bars.keys().map(str::to_string).collect()
    }

    fn sel(ed: &Editor) -> Option<(String, String)> {
        ed.selection().map(|s| (s.theme.clone(), s.bar.clone()))
    }

    // ── Loading ──

    #[test]
    fn failed_load_keeps_state() {
        let mut ed = editor();
        ed.select_bar("A", "x");
        let before = ed.resolved();
        assert!(ed.load_document_text("{ broken").is_err());
        assert_eq!(ed.resolved(), before);
        assert!(ed.draft().is_some());
    }

    #[test]
    fn session_survives_restart() {
        let mut ed = editor();
        ed.select_bar("A", "y");
        ed.edit_swatch("A", "y", SwatchTarget::pc(0), "#123456");
        ed.confirm_draft().unwrap();
        ed.set_percent(0.5);

        let text = ed.session().to_text().unwrap();
        let mut restored = Editor::new(ed.config().clone(), Persistence::new(crate::MemoryStore::with_text(text)));
        restored.load_document_text(DOC).unwrap();
        assert_eq!(restored.session().percent, 0.5);
        assert_eq!(sel(&restored), Some(("A".into(), "y".into())));
        assert_eq!(restored.draft().map(Draft::bar), Some("y"));
        assert_eq!(
            restored.resolved().get("A").unwrap().bars.get("y"),
            Some(&BarValue::Pc(vec![hex("#123456"), hex("#ffffff")]))
        );
    }

    // ── Selection ──

    #[test]
    fn select_theme_lands_on_first_bar() {
        let mut ed = editor();
        assert!(ed.select_theme("A"));
        assert_eq!(sel(&ed), Some(("A".into(), "x".into())));
        assert_eq!(ed.draft().map(Draft::bar), Some("x"));
        assert!(!ed.select_theme("missing"));
    }

    #[test]
    fn select_bar_resets_shown_shift() {
        let mut ed = editor();
        ed.select_bar("A", "x");
        ed.edit_hsl(HslShift::new(30.0, 0.0, 0.0));
        assert_eq!(ed.session().bar_adjust, HslShift::new(30.0, 0.0, 0.0));
        ed.select_bar("A", "y");
        assert_eq!(ed.session().bar_adjust, HslShift::ZERO);
    }

    #[test]
    fn switching_commits_by_default() {
        let mut ed = editor();
        ed.select_bar("A", "x");
        ed.edit_swatch("A", "x", SwatchTarget::pc(1), "#000000");
        ed.select_bar("A", "y");
        assert_eq!(
            ed.resolved().get("A").unwrap().bars.get("x"),
            Some(&BarValue::Pc(vec![hex("#ff0000"), hex("#000000")]))
        );
    }

    #[test]
    fn resolver_can_discard() {
        let mut ed = editor();
        let asked = Rc::new(Cell::new(0));
        let counter = Rc::clone(&asked);
        ed.set_conflict_resolver(move |_| {
            counter.set(counter.get() + 1);
            ConflictChoice::Discard
        });
        ed.select_bar("A", "x");
        ed.edit_swatch("A", "x", SwatchTarget::pc(1), "#000000");
        ed.select_bar("A", "x");
        assert_eq!(asked.get(), 0);
        assert!(ed.draft().unwrap().is_dirty());

        ed.clear_selection();
        assert_eq!(asked.get(), 1);
        assert_eq!(ed.selection(), None);
        assert!(ed.draft().is_none());
        assert!(!ed.has_any_edits());
    }

    #[test]
    fn select_theme_asks_before_leaving_a_sibling_bar() {
        let mut ed = editor();
        let asked = Rc::new(Cell::new(0));
        let counter = Rc::clone(&asked);
        ed.set_conflict_resolver(move |_| {
            counter.set(counter.get() + 1);
            ConflictChoice::Commit
        });
        ed.select_bar("A", "y");
        ed.edit_swatch("A", "y", SwatchTarget::pc(0), "#123456");

        assert!(ed.select_theme("A"));
        assert_eq!(asked.get(), 1);
        assert_eq!(ed.draft().map(Draft::bar), Some("x"));
        assert_eq!(
            ed.resolved().get("A").unwrap().bars.get("y"),
            Some(&BarValue::Pc(vec![hex("#123456"), hex("#ffffff")]))
        );
    }

    #[test]
    fn select_theme_keeps_a_draft_on_its_first_bar() {
        let mut ed = editor();
        ed.set_conflict_resolver(|_| ConflictChoice::Discard);
        ed.select_bar("A", "x");
        ed.edit_swatch("A", "x", SwatchTarget::pc(0), "#123456");
        assert!(ed.select_theme("A"));
        assert!(ed.draft().unwrap().is_dirty());
    }

    #[test]
    fn replacing_the_drafted_theme_asks_first() {
        let mut ed = editor();
        let asked = Rc::new(Cell::new(0));
        let counter = Rc::clone(&asked);
        ed.set_conflict_resolver(move |_| {
            counter.set(counter.get() + 1);
            ConflictChoice::Commit
        });

        ed.select_bar("A", "y");
        ed.edit_swatch("A", "y", SwatchTarget::pc(0), "#123456");
        assert!(ed.copy_theme("A", "A"));
        assert_eq!(asked.get(), 1);
        assert_eq!(
            ed.resolved().get("A").unwrap().bars.get("y"),
            Some(&BarValue::Pc(vec![hex("#123456"), hex("#ffffff")]))
        );

        ed.select_bar("A", "y");
        ed.edit_swatch("A", "y", SwatchTarget::pc(1), "#000000");
        ed.add_theme("A", ThemeKind::Pc, None);
        assert_eq!(asked.get(), 2);
        assert!(ed.draft().is_none());
    }

    // ── Themes ──

    #[test]
    fn add_theme_labels_and_selects() {
        let mut ed = editor();
        ed.add_theme("C", ThemeKind::Ps1, None);
        let c = ed.resolved().get("C").cloned().unwrap();
        assert_eq!(c.label.as_deref(), Some("C"));
        assert_eq!(c.kind(), ThemeKind::Ps1);
        assert_eq!(sel(&ed), Some(("C".into(), String::new())));
        assert!(ed.draft().is_none());

        ed.add_theme("D", ThemeKind::Pc, Some("  Nice  "));
        assert_eq!(ed.resolved().get("D").unwrap().label.as_deref(), Some("Nice"));
    }

    #[test]
    fn rename_theme_moves_to_the_end() {
        let mut ed = editor();
        assert!(ed.rename_theme("A", "A2"));
        assert_eq!(ed.theme_keys(), ["B", "A2"]);
        assert_eq!(sel(&ed), Some(("A2".into(), "x".into())));
        assert!(!ed.rename_theme("B", "A2"));
        assert!(!ed.rename_theme("B", "B"));
        assert!(!ed.rename_theme("nope", "Z"));
    }

    #[test]
    fn deleting_selected_theme_drops_focus() {
        let mut ed = editor();
        ed.select_bar("B", "z");
        ed.edit_hsl(HslShift::new(0.0, 0.0, -10.0));
        assert!(ed.delete_theme("B"));
        assert_eq!(ed.selection(), None);
        assert!(ed.draft().is_none());
        assert_eq!(ed.theme_keys(), ["A"]);
    }

    // ── Bars ──

    #[test]
    fn add_and_copy_bar_select_the_new_bar() {
        let mut ed = editor();
        assert!(ed.add_bar("A", "w"));
        assert_eq!(sel(&ed), Some(("A".into(), "w".into())));
        assert_eq!(
            ed.resolved().get("A").unwrap().bars.get("w"),
            Some(&BarValue::Pc(vec![HexColor::black(), HexColor::black()]))
        );
        assert!(ed.copy_bar("A", "x", "x2"));
        assert_eq!(bar_keys(&ed, "A"), ["x", "y", "w", "x2"]);
        assert!(!ed.add_bar("A", "x"));
    }

    #[test]
    fn rename_bar_keeps_position() {
        let mut ed = editor();
        assert!(ed.rename_bar("A", "x", "first"));
        assert_eq!(bar_keys(&ed, "A"), ["first", "y"]);
        assert_eq!(ed.draft().map(Draft::bar), Some("first"));
    }

    #[test]
    fn delete_bar_moves_focus() {
        let mut ed = editor();
        ed.select_bar("A", "x");
        assert!(ed.delete_bar("A", "x"));
        assert_eq!(sel(&ed), Some(("A".into(), "y".into())));
        assert!(ed.delete_bar("A", "y"));
        assert_eq!(sel(&ed), Some(("A".into(), String::new())));
        assert!(ed.draft().is_none());
        assert!(!ed.delete_bar("A", "y"));
    }

    #[test]
    fn move_bar_keeps_dirty_draft() {
        let mut ed = editor();
        ed.select_bar("A", "y");
        ed.edit_swatch("A", "y", SwatchTarget::pc(0), "#010101");
        assert!(ed.move_bar("A", "y", -1));
        assert_eq!(bar_keys(&ed, "A"), ["y", "x"]);
        assert!(ed.draft().unwrap().is_dirty());
        assert!(!ed.move_bar("A", "y", -1));
    }

    // ── Editing ──

    #[test]
    fn swatch_edit_stays_in_draft_until_confirm() {
        let mut ed = editor();
        ed.select_bar("B", "z");
        assert!(ed.edit_swatch("B", "z", SwatchTarget::new(RampSide::Right, 1), "#00ff00"));
        assert!(!ed.has_any_edits());
        assert_eq!(
            ed.display_document().get("B").unwrap().bars.get("z"),
            Some(&BarValue::Ps1 {
                left: vec![HexColor::black(), HexColor::black()],
                right: vec![HexColor::white(), hex("#00ff00")],
            })
        );
        ed.confirm_draft().unwrap();
        assert!(ed.has_any_edits());
        assert!(ed.draft().is_none());
        assert_eq!(ed.confirm_draft(), Err(DraftError::NoActiveDraft));
    }

    #[test]
    fn hsl_is_absolute_from_snapshot() {
        let mut ed = editor();
        ed.select_bar("A", "x");
        ed.edit_hsl(HslShift::new(120.0, 0.0, 0.0));
        ed.edit_hsl(HslShift::new(120.0, 0.0, 0.0));
        assert_eq!(
            ed.draft().unwrap().current(),
            &BarValue::Pc(vec![hex("#00ff00"), hex("#0000ff")])
        );
        ed.edit_hsl(HslShift::ZERO);
        assert_eq!(ed.draft().unwrap().current(), ed.draft().unwrap().snapshot());
    }

    #[test]
    fn hsl_needs_a_selected_bar() {
        let mut ed = editor();
        assert!(!ed.edit_hsl(HslShift::new(10.0, 0.0, 0.0)));
        ed.add_theme("E", ThemeKind::Pc, None);
        assert!(!ed.edit_hsl(HslShift::new(10.0, 0.0, 0.0)));
    }

    #[test]
    fn reset_draft_restores_snapshot() {
        let mut ed = editor();
        ed.select_bar("A", "x");
        ed.edit_swatch("A", "x", SwatchTarget::pc(0), "#abcdef");
        ed.reset_draft();
        let draft = ed.draft().unwrap();
        assert!(!draft.is_dirty());
        assert_eq!(draft.current(), draft.snapshot());
    }

    // ── Display ──

    #[test]
    fn preview_renders_the_draft() {
        let mut ed = editor();
        assert!(ed.preview().is_none());
        ed.select_bar("A", "x");
        ed.edit_swatch("A", "x", SwatchTarget::pc(0), "#0000ff");
        ed.edit_swatch("A", "x", SwatchTarget::pc(1), "#0000ff");
        let buf = ed.preview().unwrap();
        assert_eq!(buf.get(10, 3), Some(Rgb::new(0, 0, 255)));
        assert_eq!(ed.describe("A", "x").as_deref(), Some("x\n#0000ff #0000ff"));
    }

    #[test]
    fn empty_fill_shows_no_ramp() {
        let mut ed = editor();
        ed.select_bar("A", "x");
        ed.set_percent(0.0);
        let buf = ed.preview().unwrap();
        assert!(buf.pixels().iter().all(|p| *p != Rgb::new(255, 0, 0)));
    }

    // ── Whole session ──

    #[test]
    fn export_is_pretty_and_ordered() {
        let mut ed = editor();
        ed.move_bar("A", "x", 1);
        let text = ed.export_json().unwrap();
        assert!(text.starts_with("{\n  \"A\""));
        let y = text.find("\"y\"").unwrap();
        let x = text.find("\"x\"").unwrap();
        assert!(y < x);
    }

    #[test]
    fn reset_all_restarts_draft() {
        let mut ed = editor();
        assert!(!ed.reset_all());
        ed.select_bar("A", "x");
        ed.edit_swatch("A", "x", SwatchTarget::pc(0), "#111111");
        ed.confirm_draft().unwrap();
        assert!(ed.reset_all());
        assert!(!ed.has_any_edits());
        let draft = ed.draft().unwrap();
        assert_eq!(draft.current(), &BarValue::Pc(vec![hex("#ff0000"), hex("#00ff00")]));
    }
}
