//! Whole documents — ordered theme records keyed by theme key.
//!
//! The editor never sees document text. It receives a parsed
//! `serde_json::Value` tree and hands one back on export; this module is
//! the boundary between that tree and [`ThemeRecord`]s.

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::ordered::OrderedMap;
use crate::record::ThemeRecord;

/// A parsed document: theme key → record, in document order.
pub type Document = OrderedMap<ThemeRecord>;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document must be an object of theme sections, found {found}")]
    NotAnObject { found: &'static str },

    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Read every section of a document tree.
///
/// Sections that are not objects are skipped with a warning; a top level
/// that is not an object is an error.
///
/// # Errors
///
/// [`DocumentError::NotAnObject`] if `root` is not a JSON object.
pub fn parse_document(root: &Value, steps: usize) -> Result<Document, DocumentError> {
    let Value::Object(sections) = root else {
        return Err(DocumentError::NotAnObject {
            found: json_type_name(root),
        });
    };

    let mut doc = Document::new();
    for (key, section) in sections {
        match ThemeRecord::from_json(section, steps) {
            Some(record) => {
                doc.insert(key.clone(), record);
            }
            None => warn!(theme = %key, found = json_type_name(section), "skipping non-object theme section"),
        }
    }
    Ok(doc)
}

/// The document as a JSON tree.
#[must_use]
pub fn to_json(doc: &Document) -> Value {
    serde_json::to_value(doc).unwrap_or(Value::Null)
}

/// Pretty-printed JSON text, two-space indented, in document order.
///
/// # Errors
///
/// Propagates serializer failures (not expected for well-formed records).
pub fn to_pretty_json(doc: &Document) -> Result<String, DocumentError> {
    Ok(serde_json::to_string_pretty(doc)?)
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
