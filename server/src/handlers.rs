use crate::response::{ok, ok_empty, ApiError, ApiResponse, PageData};
use crate::AppState;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use ontology_engine::{
    EngineResult, Fields, OntologyEngine, Record, TraversalDirection,
};
use ontology_model::{LinkType, ObjectType, Property};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

pub const DEFAULT_LIMIT: usize = 20;
const OFFSET: &str = "offset";
const LIMIT: &str = "limit";

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Runs a store call on the blocking pool.
async fn blocking<T, F>(engine: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&OntologyEngine) -> EngineResult<T> + Send + 'static,
    T: Send + 'static,
{
    let engine = Arc::clone(engine);
    tokio::task::spawn_blocking(move || f(&engine))
        .await
        .map_err(|e| ApiError::internal(format!("worker task failed: {e}")))?
        .map_err(ApiError::from)
}

fn take_usize(
    params: &mut HashMap<String, String>,
    key: &str,
    default: usize,
) -> Result<usize, ApiError> {
    match params.remove(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            ApiError::bad_request(format!("{key} must be a non-negative integer, got '{raw}'"))
        }),
    }
}

fn pagination(params: &mut HashMap<String, String>) -> Result<(usize, usize), ApiError> {
    Ok((
        take_usize(params, OFFSET, 0)?,
        take_usize(params, LIMIT, DEFAULT_LIMIT)?,
    ))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn fallback() -> ApiError {
    ApiError::not_found("route not found")
}

// ── Schema ───────────────────────────────────────────────────────

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SchemaSummary {
    pub version: String,
    pub namespace: String,
    pub object_types: usize,
    pub link_types: usize,
}

pub async fn list_object_types(State(engine): State<AppState>) -> ApiResult<Vec<ObjectType>> {
    Ok(ok(engine.schema().object_types()?))
}

pub async fn get_object_type(
    State(engine): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<ObjectType> {
    Ok(ok(engine.schema().object_type(&name)?))
}

pub async fn get_object_type_properties(
    State(engine): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Vec<Property>> {
    Ok(ok(engine.schema().object_type_properties(&name)?))
}

pub async fn get_outgoing_links(
    State(engine): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Vec<LinkType>> {
    Ok(ok(engine.schema().outgoing_links(&name)?))
}

pub async fn get_incoming_links(
    State(engine): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Vec<LinkType>> {
    Ok(ok(engine.schema().incoming_links(&name)?))
}

pub async fn list_link_types(State(engine): State<AppState>) -> ApiResult<Vec<LinkType>> {
    Ok(ok(engine.schema().link_types()?))
}

pub async fn get_link_type(
    State(engine): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<LinkType> {
    Ok(ok(engine.schema().link_type(&name)?))
}

pub async fn reload_schema(State(engine): State<AppState>) -> ApiResult<SchemaSummary> {
    let schema = blocking(&engine, |e| e.reload_schema()).await?;
    Ok(ok(SchemaSummary {
        version: schema.version.clone(),
        namespace: schema.namespace.clone(),
        object_types: schema.object_types.len(),
        link_types: schema.link_types.len(),
    }))
}

// ── Instances ────────────────────────────────────────────────────

pub async fn create_instance(
    State(engine): State<AppState>,
    Path(object_type): Path<String>,
    body: Result<Json<Fields>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(data) = body?;
    let id = blocking(&engine, move |e| e.instances().create(&object_type, data)).await?;
    Ok(ok(json!({ "id": id.to_string() })))
}

/// `offset` and `limit` page the result; every other query parameter is an
/// equality filter, converted to the property's declared type.
pub async fn list_instances(
    State(engine): State<AppState>,
    Path(object_type): Path<String>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> ApiResult<PageData<Record>> {
    let Query(mut params) = query?;
    let (offset, limit) = pagination(&mut params)?;
    let raw: Fields = params
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();

    let page = blocking(&engine, move |e| {
        let instances = e.instances();
        let filters = instances.coerce_filters(&object_type, raw)?;
        instances.list(&object_type, offset, limit, &filters)
    })
    .await?;

    Ok(ok(PageData {
        items: page.items,
        total: page.total,
        offset,
        limit,
    }))
}

pub async fn get_instance(
    State(engine): State<AppState>,
    Path((object_type, id)): Path<(String, String)>,
) -> ApiResult<Record> {
    let record = blocking(&engine, move |e| e.instances().get(&object_type, &id)).await?;
    Ok(ok(record))
}

pub async fn update_instance(
    State(engine): State<AppState>,
    Path((object_type, id)): Path<(String, String)>,
    body: Result<Json<Fields>, JsonRejection>,
) -> ApiResult<Record> {
    let Json(patch) = body?;
    let record = blocking(&engine, move |e| e.instances().update(&object_type, &id, patch)).await?;
    Ok(ok(record))
}

pub async fn delete_instance(
    State(engine): State<AppState>,
    Path((object_type, id)): Path<(String, String)>,
) -> ApiResult<()> {
    blocking(&engine, move |e| e.instances().delete(&object_type, &id)).await?;
    Ok(ok_empty())
}

/// Links of `link_type` whose source is the instance.
pub async fn instance_links(
    State(engine): State<AppState>,
    Path((object_type, id, link_type)): Path<(String, String, String)>,
) -> ApiResult<Vec<Record>> {
    let links = blocking(&engine, move |e| {
        e.schema().object_type(&object_type)?;
        e.links().by_source(&link_type, &id)
    })
    .await?;
    Ok(ok(links))
}

#[derive(Debug, Deserialize)]
pub struct ConnectedQuery {
    #[serde(default)]
    pub direction: Option<String>,
}

pub async fn connected_instances(
    State(engine): State<AppState>,
    Path((object_type, id, link_type)): Path<(String, String, String)>,
    query: Result<Query<ConnectedQuery>, QueryRejection>,
) -> ApiResult<Vec<Record>> {
    let Query(query) = query?;
    let direction: TraversalDirection = query.direction.as_deref().unwrap_or_default().parse()?;
    let instances = blocking(&engine, move |e| {
        e.links()
            .connected_instances(&object_type, &link_type, &id, direction)
    })
    .await?;
    Ok(ok(instances))
}

// ── Links ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateLinkRequest {
    #[serde(default)]
    pub source_id: String,
    #[serde(default)]
    pub target_id: String,
    #[serde(default)]
    pub properties: Fields,
}

pub async fn create_link(
    State(engine): State<AppState>,
    Path(link_type): Path<String>,
    body: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(request) = body?;
    let id = blocking(&engine, move |e| {
        e.links().create(
            &link_type,
            &request.source_id,
            &request.target_id,
            request.properties,
        )
    })
    .await?;
    Ok(ok(json!({ "id": id.to_string() })))
}

pub async fn list_links(
    State(engine): State<AppState>,
    Path(link_type): Path<String>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> ApiResult<PageData<Record>> {
    let Query(mut params) = query?;
    let (offset, limit) = pagination(&mut params)?;
    let page = blocking(&engine, move |e| e.links().list(&link_type, offset, limit)).await?;
    Ok(ok(PageData {
        items: page.items,
        total: page.total,
        offset,
        limit,
    }))
}

pub async fn get_link(
    State(engine): State<AppState>,
    Path((link_type, id)): Path<(String, String)>,
) -> ApiResult<Record> {
    let link = blocking(&engine, move |e| e.links().get(&link_type, &id)).await?;
    Ok(ok(link))
}

pub async fn update_link(
    State(engine): State<AppState>,
    Path((link_type, id)): Path<(String, String)>,
    body: Result<Json<Fields>, JsonRejection>,
) -> ApiResult<Record> {
    let Json(patch) = body?;
    let link = blocking(&engine, move |e| e.links().update(&link_type, &id, patch)).await?;
    Ok(ok(link))
}

pub async fn delete_link(
    State(engine): State<AppState>,
    Path((link_type, id)): Path<(String, String)>,
) -> ApiResult<()> {
    blocking(&engine, move |e| e.links().delete(&link_type, &id)).await?;
    Ok(ok_empty())
}
