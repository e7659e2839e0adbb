//! Adapter between the in-memory field values and their JSON text form.
//!
//! The rest of the crate treats this as an opaque codec: a document decodes
//! into a flat field mapping (`serde_json::Map`) with typed accessors, and a
//! mapping encodes back into compact or human-readable text.

use serde_json::{Map, Value};

/// A decoded settings document: the flat field mapping keyed by wire name.
pub(crate) type Document = Map<String, Value>;

/// Decode a settings document. Fails on malformed text or a non-object root.
pub(crate) fn decode(text: &str) -> Result<Document, serde_json::Error> {
    serde_json::from_str(text)
}

/// Encode a document, compact by default, indented when `pretty`.
pub(crate) fn encode(document: &Value, pretty: bool) -> String {
    if pretty {
        format!("{document:#}")
    } else {
        document.to_string()
    }
}
