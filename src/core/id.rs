//! Record identifiers accepted as integer or string
//!
//! The HTTP surface takes identifiers as raw path strings. Normalization is
//! applied once at the boundary: a non-empty string of decimal digits becomes
//! an integer id, anything else stays text.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A record identifier, either a store-assigned integer or a text key (UUID)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    /// Normalize a raw path identifier
    ///
    /// Digits-only strings (ASCII `0-9`, non-empty) parse to [`RecordId::Int`];
    /// all other strings, including signed or padded numbers, stay
    /// [`RecordId::Text`]. A digits-only string too large for `i64` also stays
    /// text.
    pub fn normalize(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            match raw.parse::<i64>() {
                Ok(n) => RecordId::Int(n),
                Err(_) => RecordId::Text(raw.to_string()),
            }
        } else {
            RecordId::Text(raw.to_string())
        }
    }

    /// The identifier as a JSON value
    pub fn to_value(&self) -> Value {
        match self {
            RecordId::Int(n) => Value::from(*n),
            RecordId::Text(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{}", n),
            RecordId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Int(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::Text(s)
    }
}
