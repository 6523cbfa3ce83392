//! Draft transactions — the uncommitted edit of one bar.
//!
//! A draft snapshots a bar's resolved value when it starts and edits a
//! private copy. Nothing reaches the [`Workspace`] until
//! [`DraftSlot::confirm`].
//!
//! ```text
//!   None ──start──▶ Active(clean) ──set_value / set_hsl──▶ Active(dirty)
//!                        ▲                                     │
//!                        └───────────── reset ─────────────────┤
//!   None ◀──────────────── confirm | cancel ───────────────────┘
//! ```
//!
//! Swatch edits replace the current value. HSL edits always recompute the
//! current value from the start snapshot, so setting the same shift twice
//! gives the same result and a zero shift restores the snapshot. An HSL
//! edit after a swatch edit therefore discards the swatch edit.

use hued_color::HslShift;
use hued_theme::{BarValue, Document, apply_hsl_delta};
use thiserror::Error;
use tracing::{debug, info};

use crate::workspace::Workspace;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("no active draft")]
    NoActiveDraft,

    #[error("could not write {theme}.{bar}: theme is not editable")]
    Rejected { theme: String, bar: String },
}

/// What to do with a dirty draft when focus moves away from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictChoice {
    /// Write the draft to the workspace, then switch.
    Commit,
    /// Throw the draft away, then switch.
    Discard,
}

// ---------------------------------------------------------------------------
// Draft
// ---------------------------------------------------------------------------

/// An in-progress edit of one bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    theme: String,
    bar: String,
    snapshot: BarValue,
    current: BarValue,
    shift: HslShift,
    dirty: bool,
}

impl Draft {
    /// Start editing `theme.bar` from its resolved value. `None` if the
    /// bar does not resolve.
    #[must_use]
    pub fn start(theme: &str, bar: &str, resolved: &Document) -> Option<Self> {
        let value = resolved.get(theme)?.bars.get(bar)?.clone();
        Some(Self {
            theme: theme.to_string(),
            bar: bar.to_string(),
            snapshot: value.clone(),
            current: value,
            shift: HslShift::ZERO,
            dirty: false,
        })
    }

    #[must_use]
    pub fn theme(&self) -> &str {
        &self.theme
    }

    #[must_use]
    pub fn bar(&self) -> &str {
        &self.bar
    }

    /// The value at the moment the draft started.
    #[must_use]
    pub const fn snapshot(&self) -> &BarValue {
        &self.snapshot
    }

    /// The edited value.
    #[must_use]
    pub const fn current(&self) -> &BarValue {
        &self.current
    }

    /// The HSL shift last applied.
    #[must_use]
    pub const fn shift(&self) -> HslShift {
        self.shift
    }

    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether this draft edits `theme.bar`.
    #[must_use]
    pub fn targets(&self, theme: &str, bar: &str) -> bool {
        self.theme == theme && self.bar == bar
    }

    /// Replace the current value outright. The recorded shift is kept.
    pub fn set_value(&mut self, value: BarValue) {
        self.current = value;
        self.dirty = true;
    }

    /// Set the current value to the snapshot shifted by `shift`.
    pub fn set_hsl(&mut self, shift: HslShift) {
        self.current = apply_hsl_delta(&self.snapshot, shift);
        self.shift = shift;
        self.dirty = true;
    }

    /// Back to the snapshot, zero shift, clean.
    pub fn reset(&mut self) {
        self.current = self.snapshot.clone();
        self.shift = HslShift::ZERO;
        self.dirty = false;
    }
}

// ---------------------------------------------------------------------------
// DraftSlot
// ---------------------------------------------------------------------------

/// Holds at most one active draft.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftSlot {
    active: Option<Draft>,
}

impl DraftSlot {
    #[must_use]
    pub const fn new() -> Self {
        Self { active: None }
    }

    #[must_use]
    pub const fn active(&self) -> Option<&Draft> {
        self.active.as_ref()
    }

    pub const fn active_mut(&mut self) -> Option<&mut Draft> {
        self.active.as_mut()
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.active.as_ref().is_some_and(Draft::is_dirty)
    }

    /// Start a draft for `theme.bar`, replacing whatever was active. Ends
    /// up empty if the bar does not resolve. Returns whether a draft is
    /// now active.
    pub fn start(&mut self, theme: &str, bar: &str, resolved: &Document) -> bool {
        self.active = Draft::start(theme, bar, resolved);
        match &self.active {
            Some(_) => debug!(theme, bar, "draft started"),
            None => debug!(theme, bar, "no value to draft"),
        }
        self.active.is_some()
    }

    /// Drop the active draft without writing it.
    pub fn cancel(&mut self) -> Option<Draft> {
        let draft = self.active.take();
        if let Some(d) = &draft {
            debug!(theme = d.theme(), bar = d.bar(), dirty = d.is_dirty(), "draft cancelled");
        }
        draft
    }

    /// Write the current value into `workspace` and end the draft.
    ///
    /// # Errors
    ///
    /// [`DraftError::NoActiveDraft`] if nothing is active, or
    /// [`DraftError::Rejected`] if the workspace refuses the write. On
    /// error the draft stays active.
    pub fn confirm(&mut self, workspace: &mut Workspace, base: &Document) -> Result<Draft, DraftError> {
        let draft = self.active.as_ref().ok_or(DraftError::NoActiveDraft)?;
        if !workspace.set_bar_value(draft.theme(), draft.bar(), draft.current().clone(), base) {
            return Err(DraftError::Rejected {
                theme: draft.theme().to_string(),
                bar: draft.bar().to_string(),
            });
        }
        info!(theme = draft.theme(), bar = draft.bar(), "draft committed");
        self.active.take().ok_or(DraftError::NoActiveDraft)
    }

    /// Settle a dirty draft before focus moves to `next`.
    ///
    /// `next` is the new `(theme, bar)` focus: `None` clears the
    /// selection, a `None` bar selects a theme without a bar. The `prompt`
    /// is consulted only when the draft is dirty and focus is really
    /// moving: to a different bar, to nothing, or to a different theme.
    /// A clean draft is left alone.
    ///
    /// # Errors
    ///
    /// Propagates [`DraftSlot::confirm`] failures when the choice is
    /// [`ConflictChoice::Commit`]; the draft is kept in that case.
    pub fn settle_before_switch(
        &mut self,
        next: Option<(&str, Option<&str>)>,
        workspace: &mut Workspace,
        base: &Document,
        prompt: impl FnOnce(&Draft) -> ConflictChoice,
    ) -> Result<(), DraftError> {
        let Some(draft) = self.active.as_ref().filter(|d| d.is_dirty()) else {
            return Ok(());
        };
        let leaving = match next {
            None => true,
            Some((theme, Some(bar))) => !draft.targets(theme, bar),
            Some((theme, None)) => theme != draft.theme(),
        };
        if !leaving {
            return Ok(());
        }
        match prompt(draft) {
            ConflictChoice::Commit => self.confirm(workspace, base).map(drop),
            ConflictChoice::Discard => {
                self.cancel();
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
