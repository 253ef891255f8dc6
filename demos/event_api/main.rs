//! Event API demo: one `event` resource wired through the generic registry
//!
//! Run with `cargo run --example event_api`, then try:
//!
//! ```text
//! curl -X POST localhost:1112/event -H 'content-type: application/json' \
//!   -d '{"date":"2024-01-01","organizer":{"email":"a@b.com"},"status":"open","max_attendees":10}'
//! curl localhost:1112/events
//! curl 'localhost:1112/events/filter?status=open'
//! ```

use crudgen::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let store = InMemoryStore::new().with_table(TableSchema::new(
        "event",
        IdKind::Uuid,
        vec![
            FieldSpec::new("date", FieldType::Str, FieldRole::Primary),
            FieldSpec::new("organizer", FieldType::Str, FieldRole::Required),
            FieldSpec::new("status", FieldType::Str, FieldRole::Required),
            FieldSpec::new("max_attendees", FieldType::Int, FieldRole::Required),
            FieldSpec::new("joiners", FieldType::List, FieldRole::Optional).with_default(json!([])),
        ],
    ));

    // The request shape is looser than the table where it needs to be: the
    // organizer arrives as a nested object even though the table stores it
    // under a str field.
    let shape = RequestShape::new(vec![
        FieldSpec::new("date", FieldType::Str, FieldRole::Required),
        FieldSpec::new("organizer", FieldType::Object, FieldRole::Required),
        FieldSpec::new("status", FieldType::Str, FieldRole::Required),
        FieldSpec::new("max_attendees", FieldType::Int, FieldRole::Required),
        FieldSpec::new("joiners", FieldType::List, FieldRole::Optional),
    ]);

    let filters = vec![
        FieldSpec::new("date", FieldType::Str, FieldRole::Optional).with_default(""),
        FieldSpec::new("organizer", FieldType::Str, FieldRole::Optional).with_default(""),
        FieldSpec::new("status", FieldType::Str, FieldRole::Optional).with_default(""),
        FieldSpec::new("event_type", FieldType::Str, FieldRole::Optional).with_default(""),
    ];

    let custom = Router::new().route("/test", get(|| async { Json(json!("test")) }));

    let mut api = CrudApi::new(Arc::new(store)).with_custom_routes(custom);
    api.register_resource(ResourceDef::new("event", shape).with_filters(filters))?;
    api.publish();

    api.serve("0.0.0.0:1112").await
}
