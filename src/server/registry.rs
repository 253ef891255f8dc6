//! Registry and publisher for generated route groups
//!
//! `CrudApi` owns the store handle, the registered route groups, and the
//! serving application router. Groups move through
//! `unregistered → registered → attached`; publishing twice attaches
//! nothing the second time.

use crate::core::error::{CrudError, CrudResult};
use crate::core::store::DataStore;
use crate::server::route_group::{ResourceDef, RouteGroup};
use anyhow::Result;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use indexmap::IndexMap;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Registry of route groups bound to one store and one serving application
///
/// # Example
///
/// ```ignore
/// let mut api = CrudApi::new(store);
/// api.register_resource(ResourceDef::new("event", shape).with_filters(filters))?;
/// api.publish();
/// api.serve("0.0.0.0:1112").await?;
/// ```
pub struct CrudApi {
    store: Arc<dyn DataStore>,
    groups: IndexMap<String, RouteGroup>,
    app: Router,
}

impl CrudApi {
    /// Create an empty registry over a store
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            store,
            groups: IndexMap::new(),
            app: Router::new(),
        }
    }

    /// The store handle shared by every group
    pub fn store(&self) -> Arc<dyn DataStore> {
        self.store.clone()
    }

    /// Merge caller-supplied routes into the serving application
    ///
    /// Use this for routes that don't fit the CRUD pattern (health probes
    /// beyond the built-in ones, ad-hoc endpoints, webhooks).
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.app = self.app.merge(routes);
        self
    }

    /// Build and record a route group without attaching it
    ///
    /// Fails when the resource name is already registered or the store has
    /// no table for it; both abort setup immediately.
    pub fn register_resource(&mut self, def: ResourceDef) -> CrudResult<&RouteGroup> {
        let group = RouteGroup::bind(self.store.clone(), def)?;
        let name = group.name().to_string();
        if self.groups.contains_key(&name) {
            return Err(CrudError::DuplicateResource { resource: name });
        }
        tracing::info!(resource = %name, plural = %group.plural(), "registered route group");
        Ok(self.groups.entry(name).or_insert(group))
    }

    /// Build, record, and immediately attach a route group
    pub fn include_resource(&mut self, def: ResourceDef) -> CrudResult<&RouteGroup> {
        let group = self.register_resource(def)?;
        let name = group.name().to_string();
        let group = self
            .groups
            .get_mut(&name)
            .expect("group was just registered");
        if let Some(router) = group.attach() {
            self.app = std::mem::take(&mut self.app).merge(router);
        }
        Ok(&self.groups[&name])
    }

    /// Attach every registered-but-unattached group
    ///
    /// Idempotent: a second call finds nothing to attach.
    pub fn publish(&mut self) {
        let mut attached = 0usize;
        for group in self.groups.values_mut() {
            if let Some(router) = group.attach() {
                self.app = std::mem::take(&mut self.app).merge(router);
                attached += 1;
            }
        }
        tracing::info!(attached, total = self.groups.len(), "published route groups");
    }

    /// Look up a registered group by resource name
    pub fn group(&self, name: &str) -> Option<&RouteGroup> {
        self.groups.get(name)
    }

    /// Registered resource names, in registration order
    pub fn resource_names(&self) -> Vec<&str> {
        self.groups.keys().map(|s| s.as_str()).collect()
    }

    /// How many groups have been attached to the serving application
    pub fn attached_count(&self) -> usize {
        self.groups.values().filter(|g| g.is_attached()).count()
    }

    /// Consume the registry, yielding the final application router
    ///
    /// Adds the health and introspection routes beside whatever has been
    /// attached. Groups that were never published stay off the router.
    pub fn into_router(self) -> Router {
        let resources: Vec<Value> = self
            .groups
            .values()
            .map(|group| {
                json!({
                    "name": group.name(),
                    "plural": group.plural(),
                    "tags": group.tags(),
                    "filter": group.has_filter(),
                    "attached": group.is_attached(),
                })
            })
            .collect();

        self.app.merge(health_routes()).route(
            "/resources",
            get(move || {
                let resources = resources.clone();
                async move { Json(resources) }
            }),
        )
    }

    /// Serve the application with graceful shutdown
    ///
    /// Applies request tracing and permissive CORS, binds the address, and
    /// handles SIGTERM and Ctrl+C.
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.into_router().layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        );
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "crudgen"
    }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
