//! Records and the factory that builds them from flat payloads

use crate::core::error::{CrudError, FieldError};
use crate::core::field::FieldSpec;
use crate::core::id::RecordId;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// A single resource record: an ordered field map plus an optional store id
///
/// The id is absent until the store assigns one on insert.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    id: Option<RecordId>,
    fields: IndexMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    pub fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Serialize to a JSON object: `id` first (when assigned), then the
    /// fields in declaration order
    pub fn serialize(&self) -> Value {
        let mut out = Map::new();
        if let Some(id) = &self.id {
            out.insert("id".to_string(), id.to_value());
        }
        for (name, value) in &self.fields {
            out.insert(name.clone(), value.clone());
        }
        Value::Object(out)
    }
}

/// Builds a [`Record`] from a table's field structure and a flat payload
///
/// The binder accepts any implementation; [`DefaultRecordFactory`] is the
/// stock one.
pub trait RecordFactory: Send + Sync {
    fn build(&self, fields: &[FieldSpec], payload: &Map<String, Value>) -> Result<Record, CrudError>;
}

/// Stock factory: declared fields come from the payload, missing optional
/// fields take their declared default, missing required fields are an error.
/// Payload keys not in the field structure are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRecordFactory;

impl RecordFactory for DefaultRecordFactory {
    fn build(&self, fields: &[FieldSpec], payload: &Map<String, Value>) -> Result<Record, CrudError> {
        let mut record = Record::new();
        let mut errors = Vec::new();

        for spec in fields {
            match payload.get(&spec.name) {
                Some(value) => record.set(&spec.name, value.clone()),
                None if spec.is_required() => errors.push(FieldError {
                    field: spec.name.clone(),
                    message: "field is required".to_string(),
                }),
                None => record.set(&spec.name, spec.default.clone()),
            }
        }

        if errors.is_empty() {
            Ok(record)
        } else {
            Err(CrudError::Validation { errors })
        }
    }
}
