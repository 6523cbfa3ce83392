//! Session storage backends.
//!
//! The editor hands a serialized [`Session`](crate::Session) to a
//! [`SessionStore`] after every change. A failing store never blocks
//! editing: [`Persistence`] logs the first failure and keeps the session in
//! memory from then on.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

/// Storage failures.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PersistenceError {
    fn io<'a>(action: &'static str, path: &'a Path) -> impl FnOnce(io::Error) -> Self + 'a {
        move |source| Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Somewhere to keep the raw session text.
pub trait SessionStore {
    /// The stored text, or `None` if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium exists but cannot be read.
    fn load(&self) -> Result<Option<String>, PersistenceError>;

    /// Replace the stored text.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be written.
    fn save(&mut self, text: &str) -> Result<(), PersistenceError>;
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// Keeps the session for the life of the process only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    text: Option<String>,
}

impl MemoryStore {
    #[must_use]
    pub const fn new() -> Self {
        Self { text: None }
    }

    /// Seed the store with previously saved text.
    #[must_use]
    pub const fn with_text(text: String) -> Self {
        Self { text: Some(text) }
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, PersistenceError> {
        Ok(self.text.clone())
    }

    fn save(&mut self, text: &str) -> Result<(), PersistenceError> {
        self.text = Some(text.to_owned());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// A JSON file on disk, replaced atomically on every save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileStore {
    fn load(&self) -> Result<Option<String>, PersistenceError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(PersistenceError::io("read", &self.path)(err)),
        }
    }

    fn save(&mut self, text: &str) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(PersistenceError::io("create", parent))?;
        }

        // Write beside the target, then rename over it.
        let temp = self.path.with_extension("json.tmp");
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp)
            .map_err(PersistenceError::io("create", &temp))?;
        let written = file
            .write_all(text.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(PersistenceError::io("write", &temp))
            .and_then(|()| fs::rename(&temp, &self.path).map_err(PersistenceError::io("replace", &self.path)));
        drop(file);

        if let Err(err) = written {
            if let Err(cleanup) = fs::remove_file(&temp) {
                debug!(path = %temp.display(), error = %cleanup, "temp file left behind");
            }
            return Err(err);
        }

        debug!(path = %self.path.display(), bytes = text.len(), "session saved");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// A store plus the fallback used once it has failed.
pub struct Persistence {
    store: Box<dyn SessionStore>,
    fallback: Option<MemoryStore>,
}

impl Persistence {
    pub fn new(store: impl SessionStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            fallback: None,
        }
    }

    /// In-memory only from the start.
    #[must_use]
    pub fn memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// `true` once a save has failed and the session lives in memory.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.fallback.is_some()
    }

    /// Stored session text. A read failure is logged and treated as
    /// "nothing stored".
    #[must_use]
    pub fn load(&self) -> Option<String> {
        if let Some(mem) = &self.fallback {
            return mem.text.clone();
        }
        match self.store.load() {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "could not read stored session, starting fresh");
                None
            }
        }
    }

    /// Save `text`. Never fails: the first store error switches to memory.
    pub fn save(&mut self, text: &str) {
        if let Some(mem) = &mut self.fallback {
            mem.text = Some(text.to_owned());
            return;
        }
        if let Err(err) = self.store.save(text) {
            warn!(error = %err, "session storage failed, keeping changes in memory only");
            self.fallback = Some(MemoryStore::with_text(text.to_owned()));
        }
    }
}

impl Default for Persistence {
    fn default() -> Self {
        Self::memory()
    }
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence")
            .field("degraded", &self.is_degraded())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
