//! hued-editor — the editing core behind `hued`.
//!
//! Layers, bottom to top:
//!
//! - [`workspace`]: committed changes kept beside an immutable base
//!   document (theme overrides, tombstones, legacy per-bar edits) and the
//!   operations that change them.
//! - [`draft`]: the single uncommitted edit of one bar.
//! - [`session`]: the persisted snapshot of all editor state, and
//!   [`persistence`] for where it goes.
//! - [`load`] and [`config`]: reading relaxed document text and the
//!   optional TOML config.
//! - [`editor`]: the controller that ties the above together.

pub mod config;
pub mod draft;
pub mod editor;
pub mod load;
pub mod persistence;
pub mod session;
pub mod workspace;

pub use config::{ConfigError, EditorConfig};
pub use draft::{ConflictChoice, Draft, DraftError, DraftSlot};
pub use editor::{ConflictResolver, Editor};
pub use load::{LoadError, load_document, parse_relaxed};
pub use persistence::{FileStore, MemoryStore, Persistence, PersistenceError, SessionStore};
pub use session::{SESSION_VERSION, Selection, Session};
pub use workspace::{LegacyEdits, Workspace};
