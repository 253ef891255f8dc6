//! Request shapes and their compiled validators
//!
//! A shape is declared once per resource and compiled into a validator at
//! registration time; nothing is re-derived per request.

use crate::core::error::{CrudError, CrudResult, FieldError};
use crate::core::field::{FieldSpec, FieldType};
use serde_json::{Map, Value};

/// Declared request body shape for create and update
///
/// The shape is independent of the table's field structure: the table may
/// declare a loose storage type (e.g. `str`) while the shape accepts a
/// nested object for the same field.
#[derive(Debug, Clone, Default)]
pub struct RequestShape {
    fields: Vec<FieldSpec>,
}

impl RequestShape {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Compile the shape into a validator
    ///
    /// Called once when the route group is built.
    pub fn compile(&self) -> ShapeValidator {
        ShapeValidator {
            checks: self
                .fields
                .iter()
                .map(|spec| FieldCheck {
                    name: spec.name.clone(),
                    field_type: spec.field_type,
                    required: spec.is_required(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
struct FieldCheck {
    name: String,
    field_type: FieldType,
    required: bool,
}

/// Static validator produced by [`RequestShape::compile`]
#[derive(Debug, Clone, Default)]
pub struct ShapeValidator {
    checks: Vec<FieldCheck>,
}

impl ShapeValidator {
    /// Validate a request body against the compiled shape
    ///
    /// Returns the body's object map on success. Errors accumulate per field
    /// rather than stopping at the first violation.
    pub fn validate<'a>(&self, body: &'a Value) -> CrudResult<&'a Map<String, Value>> {
        let Some(object) = body.as_object() else {
            return Err(CrudError::Validation {
                errors: vec![FieldError {
                    field: "body".to_string(),
                    message: "expected a JSON object".to_string(),
                }],
            });
        };

        let mut errors = Vec::new();
        for check in &self.checks {
            match object.get(&check.name) {
                Some(Value::Null) | None if check.required => errors.push(FieldError {
                    field: check.name.clone(),
                    message: "field is required".to_string(),
                }),
                Some(Value::Null) | None => {}
                Some(value) if !check.field_type.matches(value) => errors.push(FieldError {
                    field: check.name.clone(),
                    message: format!("expected {:?}", check.field_type).to_lowercase(),
                }),
                Some(_) => {}
            }
        }

        if errors.is_empty() {
            Ok(object)
        } else {
            Err(CrudError::Validation { errors })
        }
    }
}
