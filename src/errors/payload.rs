//! Wire shape of error bodies returned by the budgeting API.
//!
//! The server reports field errors either as a list of `{field, message}`
//! objects or as an object keyed by field name. Both are decoded here, once,
//! into a single `BTreeMap`.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Error body: `{ message?, errors?, code? }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<FieldErrorsWire>,
    #[serde(default)]
    pub code: Option<String>,
}

/// The two accepted encodings of per-field validation errors.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FieldErrorsWire {
    List(Vec<FieldErrorEntry>),
    Map(BTreeMap<String, String>),
    /// Anything else; carries no usable field detail.
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldErrorEntry {
    pub field: String,
    pub message: String,
}

impl FieldErrorsWire {
    /// Canonical `field -> message` map. Later duplicates win.
    pub fn into_map(self) -> BTreeMap<String, String> {
        match self {
            FieldErrorsWire::List(entries) => entries
                .into_iter()
                .map(|entry| (entry.field, entry.message))
                .collect(),
            FieldErrorsWire::Map(map) => map,
            FieldErrorsWire::Other(_) => BTreeMap::new(),
        }
    }
}

impl ErrorPayload {
    /// Decode a response body. Bodies that are not a JSON object of the
    /// expected shape yield `None`.
    pub fn parse(body: &str) -> Option<Self> {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return None;
        }
        match serde_json::from_str::<ErrorPayload>(trimmed) {
            Ok(payload) => Some(payload),
            Err(e) => {
                tracing::debug!(error = %e, "Error body is not a structured payload");
                None
            }
        }
    }
}
