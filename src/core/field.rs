//! Field descriptors for resource schemas and filter declarations

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declared type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Str,
    Int,
    Float,
    Bool,
    List,
    Object,
}

impl FieldType {
    /// Check whether a JSON value conforms to this type
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::Str => value.is_string(),
            FieldType::Int => value.is_i64() || value.is_u64(),
            FieldType::Float => value.is_number(),
            FieldType::Bool => value.is_boolean(),
            FieldType::List => value.is_array(),
            FieldType::Object => value.is_object(),
        }
    }

    /// Coerce a raw query-parameter string into a value of this type
    ///
    /// Returns `None` when the string cannot represent the type (e.g. a
    /// non-numeric string for an `Int` field).
    pub fn coerce(&self, raw: &str) -> Option<Value> {
        match self {
            FieldType::Str => Some(Value::String(raw.to_string())),
            FieldType::Int => raw.parse::<i64>().ok().map(Value::from),
            FieldType::Float => raw.parse::<f64>().ok().map(Value::from),
            FieldType::Bool => match raw {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            FieldType::List | FieldType::Object => {
                let parsed: Value = serde_json::from_str(raw).ok()?;
                self.matches(&parsed).then_some(parsed)
            }
        }
    }
}

/// Role of a field within its resource schema
///
/// `Primary` fields identify a record for uniqueness purposes (distinct from
/// the store-assigned id), `Required` fields must be supplied on create and
/// update, `Optional` fields fall back to their declared default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    Primary,
    Required,
    #[default]
    Optional,
}

/// A single field declaration: name, type, role and default value
///
/// Used both to describe a resource's storage shape and to declare which
/// attributes accept filter values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub role: FieldRole,
    #[serde(default)]
    pub default: Value,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, field_type: FieldType, role: FieldRole) -> Self {
        Self {
            name: name.into(),
            field_type,
            role,
            default: Value::Null,
        }
    }

    /// Set the declared default value
    ///
    /// For filter fields the default doubles as the "unset" marker: a
    /// submitted value equal to it is excluded from the filter expression.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    /// Whether a value must be present for this field
    pub fn is_required(&self) -> bool {
        matches!(self.role, FieldRole::Primary | FieldRole::Required)
    }
}
