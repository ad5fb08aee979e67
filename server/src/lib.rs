//! HTTP API for the ontology store.
//!
//! Every endpoint answers with the [`ApiResponse`] envelope. Store calls run
//! on tokio's blocking pool; schema lookups are served from the in-memory
//! snapshot.

mod handlers;
mod response;

use axum::Router;
use axum::routing::{get, post};
use ontology_engine::OntologyEngine;
use std::sync::Arc;

pub use handlers::{SchemaSummary, DEFAULT_LIMIT};
pub use response::{ApiError, ApiResponse, ErrorItem, PageData};

pub type AppState = Arc<OntologyEngine>;

/// Build the HTTP API router over the given engine.
pub fn build_router(engine: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/v1", api_routes())
        .fallback(handlers::fallback)
        .with_state(engine)
}

fn api_routes() -> Router<AppState> {
    use handlers::*;

    Router::new()
        .route("/schema/object-types", get(list_object_types))
        .route("/schema/object-types/{name}", get(get_object_type))
        .route(
            "/schema/object-types/{name}/properties",
            get(get_object_type_properties),
        )
        .route(
            "/schema/object-types/{name}/outgoing-links",
            get(get_outgoing_links),
        )
        .route(
            "/schema/object-types/{name}/incoming-links",
            get(get_incoming_links),
        )
        .route("/schema/link-types", get(list_link_types))
        .route("/schema/link-types/{name}", get(get_link_type))
        .route("/schema/reload", post(reload_schema))
        .route(
            "/instances/{object_type}",
            post(create_instance).get(list_instances),
        )
        .route(
            "/instances/{object_type}/{id}",
            get(get_instance).put(update_instance).delete(delete_instance),
        )
        .route(
            "/instances/{object_type}/{id}/links/{link_type}",
            get(instance_links),
        )
        .route(
            "/instances/{object_type}/{id}/connected/{link_type}",
            get(connected_instances),
        )
        .route("/links/{link_type}", post(create_link).get(list_links))
        .route(
            "/links/{link_type}/{id}",
            get(get_link).put(update_link).delete(delete_link),
        )
}
