//! Route-group binder: one resource declaration to one routed group
//!
//! Binding looks the resource's table up in the store (a missing table is a
//! fatal setup error), compiles the request shape, and builds the group's
//! router once. The group then carries a single attached flag, set when the
//! registry merges it into the serving application and never unset.

use crate::core::error::{CrudError, CrudResult};
use crate::core::field::FieldSpec;
use crate::core::pluralize::Pluralizer;
use crate::core::record::{DefaultRecordFactory, RecordFactory};
use crate::core::shape::RequestShape;
use crate::core::store::DataStore;
use crate::server::handlers::{
    ResourceState, create_record, delete_all_records, delete_record, filter_records, get_record,
    list_records, update_record,
};
use axum::Router;
use axum::routing::{delete, get, post, put};
use std::sync::Arc;

/// Declaration of one CRUD resource
pub struct ResourceDef {
    pub name: String,
    pub shape: RequestShape,
    pub factory: Arc<dyn RecordFactory>,
    pub use_prefix: bool,
    pub use_name_as_tag: bool,
    pub filters: Vec<FieldSpec>,
}

impl ResourceDef {
    /// Declare a resource with the stock factory, automatic path prefixing,
    /// the resource name as documentation tag, and no filter endpoint
    pub fn new(name: impl Into<String>, shape: RequestShape) -> Self {
        Self {
            name: name.into(),
            shape,
            factory: Arc::new(DefaultRecordFactory),
            use_prefix: true,
            use_name_as_tag: true,
            filters: Vec::new(),
        }
    }

    /// Supply a custom record factory
    pub fn with_factory(mut self, factory: impl RecordFactory + 'static) -> Self {
        self.factory = Arc::new(factory);
        self
    }

    /// Declare filter fields, enabling the filter endpoint
    pub fn with_filters(mut self, filters: Vec<FieldSpec>) -> Self {
        self.filters = filters;
        self
    }

    /// Mount every route unmodified under the raw `/{name}` base instead of
    /// pluralizing collection paths
    pub fn without_prefix(mut self) -> Self {
        self.use_prefix = false;
        self
    }

    /// Do not tag the group with its resource name
    pub fn without_tag(mut self) -> Self {
        self.use_name_as_tag = false;
        self
    }
}

/// The bundle of HTTP handlers generated for one resource
#[derive(Debug)]
pub struct RouteGroup {
    name: String,
    plural: String,
    tags: Vec<String>,
    has_filter: bool,
    attached: bool,
    router: Option<Router>,
}

impl RouteGroup {
    /// Bind a resource declaration against a store
    ///
    /// Fails with [`CrudError::UnknownTable`] when the store has no table for
    /// the resource; registration is expected to abort setup on that.
    pub fn bind(store: Arc<dyn DataStore>, def: ResourceDef) -> CrudResult<Self> {
        let name = def.name.to_lowercase();
        let schema = store.table(&name).ok_or_else(|| CrudError::UnknownTable {
            table: name.clone(),
        })?;

        let plural = Pluralizer::pluralize(&name);
        let tags = if def.use_name_as_tag {
            vec![name.clone()]
        } else {
            Vec::new()
        };

        let state = ResourceState {
            store,
            resource: name.clone(),
            table_fields: Arc::new(schema.fields),
            validator: Arc::new(def.shape.compile()),
            factory: def.factory,
            filters: Arc::new(def.filters),
        };

        // Collection paths are pluralized by default; opting out mounts the
        // whole group under the raw resource name.
        let collection = if def.use_prefix {
            format!("/{}", plural)
        } else {
            format!("/{}", name)
        };
        let filter_path = format!("{}/filter", collection);
        let item_base = format!("/{}", name);
        let single = format!("{}/single/{{id}}", item_base);

        let has_filter = !state.filters.is_empty();
        let mut router = Router::new()
            .route(&collection, get(list_records))
            .route(&collection, delete(delete_all_records));
        if has_filter {
            router = router.route(&filter_path, get(filter_records));
        }
        let router = router
            .route(&item_base, post(create_record))
            .route(&single, get(get_record))
            .route(&single, put(update_record))
            .route(&single, delete(delete_record))
            .with_state(state);

        Ok(Self {
            name,
            plural,
            tags,
            has_filter,
            attached: false,
            router: Some(router),
        })
    }

    /// The resource name (singular, lowercase)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The plural collection name
    pub fn plural(&self) -> &str {
        &self.plural
    }

    /// Documentation tags for the group
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Whether the filter endpoint was generated
    pub fn has_filter(&self) -> bool {
        self.has_filter
    }

    /// Whether the group has been attached to the serving application
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Take the group's router for attachment, marking the group attached
    ///
    /// Returns `None` on every call after the first; attachment is
    /// idempotent.
    pub(crate) fn attach(&mut self) -> Option<Router> {
        self.attached = true;
        self.router.take()
    }
}
