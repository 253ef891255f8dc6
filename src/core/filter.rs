//! Filter expressions compiled from query parameters
//!
//! The one nontrivial rule lives here: a filter field is "unset" when its
//! submitted value equals the declared default, not when it is null. Unset
//! fields are excluded from the expression handed to the store.

use crate::core::error::{CrudError, CrudResult, FieldError};
use crate::core::field::FieldSpec;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;

/// The populated subset of filter fields passed to the store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterExpr {
    fields: IndexMap<String, Value>,
}

impl FilterExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Compile query parameters against the declared filter specs
    ///
    /// For each spec: an absent parameter is skipped; a present one is
    /// coerced to the spec's declared type (a failed coercion is a
    /// validation error); a coerced value equal to the spec's declared
    /// default is skipped as unset.
    pub fn from_query(specs: &[FieldSpec], params: &HashMap<String, String>) -> CrudResult<Self> {
        let mut expr = FilterExpr::new();
        let mut errors = Vec::new();

        for spec in specs {
            let Some(raw) = params.get(&spec.name) else {
                continue;
            };
            match spec.field_type.coerce(raw) {
                Some(value) if value == spec.default => {}
                Some(value) => expr.insert(&spec.name, value),
                None => errors.push(FieldError {
                    field: spec.name.clone(),
                    message: format!("expected {:?}", spec.field_type).to_lowercase(),
                }),
            }
        }

        if errors.is_empty() {
            Ok(expr)
        } else {
            Err(CrudError::Validation { errors })
        }
    }
}
