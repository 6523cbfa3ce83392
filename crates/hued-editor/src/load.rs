//! Relaxed document text.
//!
//! Theme documents are hand-edited JSON5: comments, trailing commas,
//! unquoted keys, single-quoted strings and hex numbers are all allowed.
//! The text is parsed with `json5` into a `serde_json` tree (key order
//! kept), and the tree is then read into a [`Document`].

use hued_theme::{Document, DocumentError, parse_document};
use serde_json::Value;
use thiserror::Error;
use tracing::info;

/// Why a document could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The text is not JSON5. Position is 1-based when the parser knows it.
    #[error("syntax error{}: {message}", at(.position))]
    Syntax {
        position: Option<(usize, usize)>,
        message: String,
    },
    #[error(transparent)]
    Document(#[from] DocumentError),
}

fn at(position: &Option<(usize, usize)>) -> String {
    position.map_or_else(String::new, |(line, column)| format!(" at line {line}, column {column}"))
}

impl From<json5::Error> for LoadError {
    fn from(err: json5::Error) -> Self {
        let json5::Error::Message { msg, location } = err;
        Self::Syntax {
            position: location.map(|at| (at.line, at.column)),
            message: msg,
        }
    }
}

/// Parse JSON5 text into a JSON tree.
///
/// # Errors
///
/// [`LoadError::Syntax`] with the parser's position and message.
pub fn parse_relaxed(text: &str) -> Result<Value, LoadError> {
    Ok(json5::from_str(text)?)
}

/// Parse JSON5 text straight into a [`Document`].
///
/// # Errors
///
/// Syntax errors, or a root that is not an object.
pub fn load_document(text: &str, steps: usize) -> Result<Document, LoadError> {
    let root = parse_relaxed(text)?;
    let doc = parse_document(&root, steps)?;
    info!(themes = doc.len(), "document loaded");
    Ok(doc)
}
