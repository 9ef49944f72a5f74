//! Schema loader: accepts raw documents and checks they are keyed mappings.

use serde_json::{Map, Value};

use crate::error::{MalformedDocument, MalformedFailure, ResolveError};

/// Raw configuration document as produced by an external source.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceDocument {
    /// Label identifying the document in diagnostics (e.g. its file path).
    pub origin: String,
    /// Parsed but unvalidated content.
    pub value: Value,
}

impl SourceDocument {
    #[must_use]
    pub fn new(origin: impl Into<String>, value: Value) -> Self {
        Self {
            origin: origin.into(),
            value,
        }
    }
}

/// Document confirmed to be a keyed mapping.
#[derive(Clone, Debug, PartialEq)]
pub struct RawDocument {
    /// Position in the input sequence.
    pub index: usize,
    /// Label identifying the document in diagnostics.
    pub origin: String,
    /// Top-level fields.
    pub fields: Map<String, Value>,
}

/// Confirm every document is a mapping, preserving input order.
///
/// # Errors
///
/// Returns [`ResolveError::MalformedInput`] listing every document that is
/// not a mapping.
pub fn load(documents: Vec<SourceDocument>) -> Result<Vec<RawDocument>, ResolveError> {
    let (raw, malformed) = split(documents);
    if malformed.is_empty() {
        return Ok(raw);
    }
    Err(ResolveError::MalformedInput(MalformedFailure {
        documents: malformed,
        rejected: Vec::new(),
    }))
}

/// Separate mappings from malformed documents, preserving input order.
pub(crate) fn split(documents: Vec<SourceDocument>) -> (Vec<RawDocument>, Vec<MalformedDocument>) {
    let mut raw = Vec::with_capacity(documents.len());
    let mut malformed = Vec::new();
    for (index, doc) in documents.into_iter().enumerate() {
        match doc.value {
            Value::Object(fields) => raw.push(RawDocument {
                index,
                origin: doc.origin,
                fields,
            }),
            other => malformed.push(MalformedDocument {
                index,
                origin: doc.origin,
                found: value_kind(&other),
            }),
        }
    }
    (raw, malformed)
}

/// Short name of a JSON value's shape, for messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
