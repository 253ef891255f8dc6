//! In-memory implementation of DataStore for testing and development

use crate::core::error::{CrudError, CrudResult};
use crate::core::filter::FilterExpr;
use crate::core::id::RecordId;
use crate::core::record::Record;
use crate::core::store::{DataStore, IdKind, TableSchema};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

struct TableState {
    schema: TableSchema,
    rows: IndexMap<RecordId, Record>,
    next_seq: i64,
}

impl TableState {
    fn new(schema: TableSchema) -> Self {
        Self {
            schema,
            rows: IndexMap::new(),
            next_seq: 0,
        }
    }

    fn next_id(&mut self) -> RecordId {
        match self.schema.id_kind {
            IdKind::Sequence => {
                self.next_seq += 1;
                RecordId::Int(self.next_seq)
            }
            IdKind::Uuid => RecordId::Text(Uuid::new_v4().to_string()),
        }
    }

    /// Another row (excluding `exclude`) already holding this record's
    /// primary field value
    fn primary_conflict(&self, record: &Record, exclude: Option<&RecordId>) -> bool {
        let Some(primary) = self.schema.primary_field() else {
            return false;
        };
        let Some(value) = record.get(&primary.name) else {
            return false;
        };
        self.rows
            .iter()
            .any(|(id, row)| exclude != Some(id) && row.get(&primary.name) == Some(value))
    }
}

/// In-memory data store implementation
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
/// Tables enforce primary-field uniqueness, so declined inserts are
/// observable without a real backend.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<HashMap<String, TableState>>>,
}

impl InMemoryStore {
    /// Create a new in-memory store with no tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a table
    pub fn add_table(&self, schema: TableSchema) {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        tracing::debug!(table = %schema.name, "declaring in-memory table");
        tables.insert(schema.name.clone(), TableState::new(schema));
    }

    /// Builder-style variant of [`add_table`](Self::add_table)
    pub fn with_table(self, schema: TableSchema) -> Self {
        self.add_table(schema);
        self
    }

    fn read_table<T>(
        &self,
        name: &str,
        f: impl FnOnce(&TableState) -> CrudResult<T>,
    ) -> CrudResult<T> {
        let tables = self
            .tables
            .read()
            .map_err(|e| CrudError::Store {
                message: format!("failed to acquire read lock: {}", e),
            })?;
        let table = tables.get(name).ok_or_else(|| CrudError::UnknownTable {
            table: name.to_string(),
        })?;
        f(table)
    }

    fn write_table<T>(
        &self,
        name: &str,
        f: impl FnOnce(&mut TableState) -> CrudResult<T>,
    ) -> CrudResult<T> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| CrudError::Store {
                message: format!("failed to acquire write lock: {}", e),
            })?;
        let table = tables.get_mut(name).ok_or_else(|| CrudError::UnknownTable {
            table: name.to_string(),
        })?;
        f(table)
    }
}

#[async_trait]
impl DataStore for InMemoryStore {
    fn table(&self, name: &str) -> Option<TableSchema> {
        let tables = self.tables.read().ok()?;
        tables.get(name).map(|t| t.schema.clone())
    }

    async fn get_all(&self, name: &str) -> CrudResult<Vec<Record>> {
        self.read_table(name, |table| Ok(table.rows.values().cloned().collect()))
    }

    async fn get_by_filter(&self, name: &str, filter: &FilterExpr) -> CrudResult<Vec<Record>> {
        self.read_table(name, |table| {
            Ok(table
                .rows
                .values()
                .filter(|row| filter.iter().all(|(k, v)| row.get(k) == Some(v)))
                .cloned()
                .collect())
        })
    }

    async fn get_by_id(&self, name: &str, id: &RecordId) -> CrudResult<Option<Record>> {
        self.read_table(name, |table| Ok(table.rows.get(id).cloned()))
    }

    async fn insert(&self, name: &str, mut record: Record) -> CrudResult<Record> {
        self.write_table(name, |table| {
            if table.primary_conflict(&record, None) {
                return Err(CrudError::Conflict {
                    resource: name.to_string(),
                });
            }
            let id = match record.id() {
                Some(id) if table.rows.contains_key(id) => {
                    return Err(CrudError::Conflict {
                        resource: name.to_string(),
                    });
                }
                Some(id) => id.clone(),
                None => table.next_id(),
            };
            record.set_id(id.clone());
            table.rows.insert(id.clone(), record.clone());
            tracing::debug!(table = name, %id, "inserted record");
            Ok(record)
        })
    }

    async fn update(&self, name: &str, id: &RecordId, mut record: Record) -> CrudResult<Record> {
        self.write_table(name, |table| {
            if !table.rows.contains_key(id) {
                return Err(CrudError::NotFound {
                    resource: name.to_string(),
                    id: id.clone(),
                });
            }
            if table.primary_conflict(&record, Some(id)) {
                return Err(CrudError::Conflict {
                    resource: name.to_string(),
                });
            }
            record.set_id(id.clone());
            table.rows.insert(id.clone(), record.clone());
            tracing::debug!(table = name, %id, "replaced record");
            Ok(record)
        })
    }

    async fn delete(&self, name: &str, id: &RecordId) -> CrudResult<()> {
        self.write_table(name, |table| {
            table
                .rows
                .shift_remove(id)
                .map(|_| {
                    tracing::debug!(table = name, %id, "deleted record");
                })
                .ok_or_else(|| CrudError::NotFound {
                    resource: name.to_string(),
                    id: id.clone(),
                })
        })
    }

    async fn clear(&self, name: &str) -> CrudResult<u64> {
        self.write_table(name, |table| {
            let removed = table.rows.len() as u64;
            table.rows.clear();
            tracing::debug!(table = name, removed, "cleared table");
            Ok(removed)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::{FieldRole, FieldSpec, FieldType};
    use serde_json::json;

    fn event_store() -> InMemoryStore {
        InMemoryStore::new().with_table(TableSchema::new(
            "event",
            IdKind::Sequence,
            vec![
                FieldSpec::new("date", FieldType::Str, FieldRole::Primary),
                FieldSpec::new("status", FieldType::Str, FieldRole::Required),
            ],
        ))
    }

    fn event(date: &str, status: &str) -> Record {
        let mut record = Record::new();
        record.set("date", json!(date));
        record.set("status", json!(status));
        record
    }

    #[tokio::test]
    async fn test_insert_assigns_sequence_ids() {
        let store = event_store();
        let first = store.insert("event", event("2024-01-01", "open")).await.unwrap();
        let second = store.insert("event", event("2024-01-02", "open")).await.unwrap();
        assert_eq!(first.id(), Some(&RecordId::Int(1)));
        assert_eq!(second.id(), Some(&RecordId::Int(2)));
    }

    #[tokio::test]
    async fn test_insert_assigns_uuid_ids() {
        let store = InMemoryStore::new().with_table(TableSchema::new(
            "event",
            IdKind::Uuid,
            vec![FieldSpec::new("date", FieldType::Str, FieldRole::Primary)],
        ));
        let created = store.insert("event", event("2024-01-01", "open")).await.unwrap();
        match created.id() {
            Some(RecordId::Text(s)) => {
                Uuid::parse_str(s).expect("id should be a uuid");
            }
            other => panic!("unexpected id: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_insert_duplicate_primary_conflicts() {
        let store = event_store();
        store.insert("event", event("2024-01-01", "open")).await.unwrap();
        let err = store
            .insert("event", event("2024-01-01", "closed"))
            .await
            .expect_err("duplicate primary");
        assert!(matches!(err, CrudError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_get_all_and_by_id() {
        let store = event_store();
        let created = store.insert("event", event("2024-01-01", "open")).await.unwrap();
        let all = store.get_all("event").await.unwrap();
        assert_eq!(all.len(), 1);
        let fetched = store
            .get_by_id("event", created.id().unwrap())
            .await
            .unwrap()
            .expect("should exist");
        assert_eq!(fetched.get("status"), Some(&json!("open")));
    }

    #[tokio::test]
    async fn test_get_by_id_missing_returns_none() {
        let store = event_store();
        let found = store.get_by_id("event", &RecordId::Int(9)).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_get_by_filter_equality() {
        let store = event_store();
        store.insert("event", event("2024-01-01", "open")).await.unwrap();
        store.insert("event", event("2024-01-02", "closed")).await.unwrap();

        let mut filter = FilterExpr::new();
        filter.insert("status", json!("open"));
        let matched = store.get_by_filter("event", &filter).await.unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].get("date"), Some(&json!("2024-01-01")));
    }

    #[tokio::test]
    async fn test_empty_filter_matches_everything() {
        let store = event_store();
        store.insert("event", event("2024-01-01", "open")).await.unwrap();
        store.insert("event", event("2024-01-02", "closed")).await.unwrap();
        let matched = store.get_by_filter("event", &FilterExpr::new()).await.unwrap();
        assert_eq!(matched.len(), 2);
    }

    #[tokio::test]
    async fn test_update_replaces_by_id() {
        let store = event_store();
        let created = store.insert("event", event("2024-01-01", "open")).await.unwrap();
        let id = created.id().unwrap().clone();

        let updated = store
            .update("event", &id, event("2024-01-01", "closed"))
            .await
            .unwrap();
        assert_eq!(updated.id(), Some(&id));
        assert_eq!(updated.get("status"), Some(&json!("closed")));
        assert_eq!(store.get_all("event").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_id_not_found() {
        let store = event_store();
        let err = store
            .update("event", &RecordId::Int(9), event("d", "s"))
            .await
            .expect_err("nothing to update");
        assert!(matches!(err, CrudError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_primary_collision_conflicts() {
        let store = event_store();
        store.insert("event", event("2024-01-01", "open")).await.unwrap();
        let second = store.insert("event", event("2024-01-02", "open")).await.unwrap();
        let err = store
            .update("event", second.id().unwrap(), event("2024-01-01", "open"))
            .await
            .expect_err("primary collision with first row");
        assert!(matches!(err, CrudError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_delete_and_missing_delete() {
        let store = event_store();
        let created = store.insert("event", event("2024-01-01", "open")).await.unwrap();
        let id = created.id().unwrap().clone();

        store.delete("event", &id).await.unwrap();
        assert!(store.get_all("event").await.unwrap().is_empty());

        let err = store.delete("event", &id).await.expect_err("already gone");
        assert!(matches!(err, CrudError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_clear_returns_removed_count() {
        let store = event_store();
        store.insert("event", event("2024-01-01", "open")).await.unwrap();
        store.insert("event", event("2024-01-02", "open")).await.unwrap();
        assert_eq!(store.clear("event").await.unwrap(), 2);
        assert_eq!(store.clear("event").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_table_errors() {
        let store = event_store();
        let err = store.get_all("missing").await.expect_err("no table");
        assert!(matches!(err, CrudError::UnknownTable { .. }));
    }

    #[test]
    fn test_table_lookup() {
        let store = event_store();
        assert!(store.table("event").is_some());
        assert!(store.table("missing").is_none());
    }
}
