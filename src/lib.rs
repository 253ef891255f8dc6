//! # Crudgen
//!
//! Schema-driven REST CRUD endpoint generation for Rust, backed by a
//! pluggable data store.
//!
//! ## Features
//!
//! - **Declared schemas**: field name, type, role and default per resource
//! - **Generated route groups**: list, filter, get-by-id, create, update,
//!   delete and delete-all per resource, built once at registration
//! - **Compiled validation**: request shapes become static validators, never
//!   re-derived per request
//! - **Pluggable storage**: everything delegates through the `DataStore`
//!   trait; an in-memory store ships for testing and development
//! - **Idempotent publishing**: route groups attach to the serving
//!   application at most once
//! - **Auto-Pluralization**: collection paths pluralize the resource name
//!   (company → companies)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use crudgen::prelude::*;
//!
//! let store = InMemoryStore::new().with_table(TableSchema::new(
//!     "event",
//!     IdKind::Uuid,
//!     vec![
//!         FieldSpec::new("date", FieldType::Str, FieldRole::Primary),
//!         FieldSpec::new("status", FieldType::Str, FieldRole::Required),
//!     ],
//! ));
//!
//! let mut api = CrudApi::new(Arc::new(store));
//! api.register_resource(ResourceDef::new(
//!     "event",
//!     RequestShape::new(vec![
//!         FieldSpec::new("date", FieldType::Str, FieldRole::Required),
//!         FieldSpec::new("status", FieldType::Str, FieldRole::Required),
//!     ]),
//! ))?;
//! api.publish();
//! api.serve("0.0.0.0:1112").await?;
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{CrudError, CrudResult, FieldError},
        field::{FieldRole, FieldSpec, FieldType},
        filter::FilterExpr,
        id::RecordId,
        pluralize::Pluralizer,
        record::{DefaultRecordFactory, Record, RecordFactory},
        shape::{RequestShape, ShapeValidator},
        store::{DataStore, IdKind, TableSchema},
    };

    // === Server ===
    pub use crate::server::{CrudApi, ResourceDef, ResourceState, RouteGroup};

    // === Storage ===
    #[cfg(feature = "in-memory")]
    pub use crate::storage::InMemoryStore;

    // === Config ===
    pub use crate::config::{ResourceEntry, ResourcesConfig};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::json;
    pub use std::sync::Arc;
    pub use uuid::Uuid;

    // === Axum ===
    pub use axum::{
        Json, Router,
        extract::{Path, Query, State},
        routing::{delete, get, post, put},
    };
}
