//! Server module: route-group generation and the registry that publishes them
//!
//! The binder turns one resource declaration into one routed group; the
//! registry collects groups and attaches them to a single serving
//! application, with health and introspection routes on the side.

pub mod handlers;
pub mod registry;
pub mod route_group;

pub use handlers::ResourceState;
pub use registry::CrudApi;
pub use route_group::{ResourceDef, RouteGroup};
