//! Buffered record representation.
//!
//! A [`Document`] is a JSON object encoded once at admission. The encoded text
//! is what the store receives, and its byte length is the size estimate that
//! buffers use for accounting.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::MAX_DOCUMENT_BYTES;
use crate::error_handling::DocumentError;

/// Field holding a document's identifying key.
pub const ID_FIELD: &str = "_id";

/// An encoded JSON object ready to be written to a collection.
///
/// Key order of the source value is preserved. The string form of the `_id`
/// field, if any, is extracted so stores can index it without reparsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    json: String,
    id: Option<String>,
}

impl Document {
    /// Encodes any serializable value into a document.
    ///
    /// # Errors
    ///
    /// Returns a `DocumentError` if the value cannot be encoded, is not a JSON
    /// object, or encodes to more than `MAX_DOCUMENT_BYTES`.
    pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Self, DocumentError> {
        match serde_json::to_value(value)? {
            Value::Object(map) => Self::from_map(map),
            other => Err(DocumentError::NotAnObject {
                kind: json_kind(&other),
            }),
        }
    }

    /// Parses a single line of JSON text into a document.
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        match serde_json::from_str::<Value>(text)? {
            Value::Object(map) => Self::from_map(map),
            other => Err(DocumentError::NotAnObject {
                kind: json_kind(&other),
            }),
        }
    }

    /// Builds a document from an already parsed JSON object.
    pub fn from_map(map: Map<String, Value>) -> Result<Self, DocumentError> {
        let id = map.get(ID_FIELD).map(id_key);
        let json = serde_json::to_string(&map)?;
        if json.len() > MAX_DOCUMENT_BYTES {
            return Err(DocumentError::TooLarge {
                size: json.len(),
                max: MAX_DOCUMENT_BYTES,
            });
        }
        Ok(Document { json, id })
    }

    /// Rebuilds a document read back from a store.
    pub(crate) fn from_stored(json: String, id: Option<String>) -> Self {
        Document { json, id }
    }

    /// Encoded size in bytes.
    pub fn len(&self) -> usize {
        self.json.len()
    }

    /// Always false: an encoded object is at least `{}`.
    pub fn is_empty(&self) -> bool {
        self.json.is_empty()
    }

    /// String form of the `_id` field, if the document has one.
    ///
    /// String ids are used as-is; any other JSON value uses its JSON text, so
    /// `{"_id": 7}` has id `7` and `{"_id": "7"}` has id `7` as well.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Encoded JSON text.
    pub fn as_str(&self) -> &str {
        &self.json
    }

    /// Decodes the document back into a JSON value.
    pub fn to_value(&self) -> Result<Value, DocumentError> {
        Ok(serde_json::from_str(&self.json)?)
    }
}

fn id_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
