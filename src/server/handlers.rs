//! Generated HTTP handlers
//!
//! One [`ResourceState`] is built per route group at registration time and
//! shared by its handlers; nothing is derived per request. Read handlers
//! return typed errors rendered as HTTP statuses. Mutating handlers keep the
//! boolean-flagged envelope: `Conflict`/`NotFound` from the store become
//! `{"success": false}`, any other store failure
//! `{"success": false, "error": …}`.

use crate::core::error::{CrudError, CrudResult};
use crate::core::field::FieldSpec;
use crate::core::filter::FilterExpr;
use crate::core::id::RecordId;
use crate::core::record::{Record, RecordFactory};
use crate::core::shape::ShapeValidator;
use crate::core::store::DataStore;
use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;

/// Immutable per-resource state captured by the generated handlers
#[derive(Clone)]
pub struct ResourceState {
    pub store: Arc<dyn DataStore>,
    pub resource: String,
    pub table_fields: Arc<Vec<FieldSpec>>,
    pub validator: Arc<ShapeValidator>,
    pub factory: Arc<dyn RecordFactory>,
    pub filters: Arc<Vec<FieldSpec>>,
}

fn format_records(records: Vec<Record>) -> Value {
    Value::Array(records.iter().map(Record::serialize).collect())
}

fn mutation_envelope(result: CrudResult<Record>, key: &str) -> Json<Value> {
    match result {
        Ok(record) => {
            let mut body = serde_json::Map::new();
            body.insert("success".to_string(), Value::Bool(true));
            body.insert(key.to_string(), record.serialize());
            Json(Value::Object(body))
        }
        Err(CrudError::Conflict { .. }) | Err(CrudError::NotFound { .. }) => {
            Json(json!({"success": false}))
        }
        Err(err) => Json(json!({"success": false, "error": err.to_string()})),
    }
}

pub async fn list_records(State(state): State<ResourceState>) -> CrudResult<Json<Value>> {
    let records = state.store.get_all(&state.resource).await?;
    Ok(Json(format_records(records)))
}

pub async fn filter_records(
    State(state): State<ResourceState>,
    Query(params): Query<HashMap<String, String>>,
) -> CrudResult<Json<Value>> {
    let filter = FilterExpr::from_query(&state.filters, &params)?;
    let records = state.store.get_by_filter(&state.resource, &filter).await?;
    Ok(Json(format_records(records)))
}

pub async fn get_record(
    State(state): State<ResourceState>,
    Path(id): Path<String>,
) -> CrudResult<Json<Value>> {
    let id = RecordId::normalize(&id);
    let record = state.store.get_by_id(&state.resource, &id).await?;
    match record {
        Some(record) => Ok(Json(record.serialize())),
        None => Err(CrudError::NotFound {
            resource: state.resource.clone(),
            id,
        }),
    }
}

pub async fn create_record(
    State(state): State<ResourceState>,
    Json(body): Json<Value>,
) -> CrudResult<Json<Value>> {
    let payload = state.validator.validate(&body)?;
    let record = state.factory.build(&state.table_fields, payload)?;
    let result = state.store.insert(&state.resource, record).await;
    Ok(mutation_envelope(result, "created_entity"))
}

pub async fn update_record(
    State(state): State<ResourceState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> CrudResult<Json<Value>> {
    let id = RecordId::normalize(&id);
    let payload = state.validator.validate(&body)?;
    let record = state.factory.build(&state.table_fields, payload)?;
    let result = state.store.update(&state.resource, &id, record).await;
    Ok(mutation_envelope(result, "updated_entity"))
}

pub async fn delete_record(
    State(state): State<ResourceState>,
    Path(id): Path<String>,
) -> Json<Value> {
    let id = RecordId::normalize(&id);
    match state.store.delete(&state.resource, &id).await {
        Ok(()) => Json(json!({"success": true, "deleted_id": id})),
        Err(CrudError::Conflict { .. }) | Err(CrudError::NotFound { .. }) => {
            Json(json!({"success": false}))
        }
        Err(err) => Json(json!({"success": false, "error": err.to_string()})),
    }
}

pub async fn delete_all_records(State(state): State<ResourceState>) -> CrudResult<Json<u64>> {
    let removed = state.store.clear(&state.resource).await?;
    Ok(Json(removed))
}
