//! The data store collaborator contract
//!
//! The framework is agnostic to the underlying storage mechanism: every real
//! operation is delegated through [`DataStore`]. Implementations signal
//! declined writes and missing records through typed errors rather than
//! panics or opaque faults.

use crate::core::error::CrudResult;
use crate::core::field::{FieldRole, FieldSpec};
use crate::core::filter::FilterExpr;
use crate::core::id::RecordId;
use crate::core::record::Record;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// How a table assigns record ids
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdKind {
    /// Monotonic integer sequence per table
    #[default]
    Sequence,
    /// Random UUID rendered as text
    Uuid,
}

/// Schema of one store table: name, id kind and field structure
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: String,
    pub id_kind: IdKind,
    pub fields: Vec<FieldSpec>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, id_kind: IdKind, fields: Vec<FieldSpec>) -> Self {
        Self {
            name: name.into(),
            id_kind,
            fields,
        }
    }

    /// The primary field, when the schema declares one
    pub fn primary_field(&self) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.role == FieldRole::Primary)
    }
}

/// Store trait consumed by the route-group binder
///
/// Errors are explicit: `Conflict` for declined writes, `NotFound` for
/// updates/deletes of missing ids, `UnknownTable` for operations against an
/// undeclared resource, `Store` for backend detail.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Look up a table's schema; `None` when the resource has no table
    fn table(&self, name: &str) -> Option<TableSchema>;

    /// All records of a table
    async fn get_all(&self, name: &str) -> CrudResult<Vec<Record>>;

    /// Records matching every field of the filter expression
    async fn get_by_filter(&self, name: &str, filter: &FilterExpr) -> CrudResult<Vec<Record>>;

    /// A single record by id
    async fn get_by_id(&self, name: &str, id: &RecordId) -> CrudResult<Option<Record>>;

    /// Insert a record, assigning an id per the table's id kind
    async fn insert(&self, name: &str, record: Record) -> CrudResult<Record>;

    /// Replace the record stored under `id`
    async fn update(&self, name: &str, id: &RecordId, record: Record) -> CrudResult<Record>;

    /// Remove one record by id
    async fn delete(&self, name: &str, id: &RecordId) -> CrudResult<()>;

    /// Remove every record of a table, returning how many were removed
    async fn clear(&self, name: &str) -> CrudResult<u64>;
}
