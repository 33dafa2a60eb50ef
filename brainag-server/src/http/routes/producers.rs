//! Producer endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{created, resource};
use crate::http::error::ApiError;
use crate::http::extractors::{ValidJson, ValidQuery, ValidUuid};
use crate::http::server::AppState;
use crate::models::validation::non_blank;
use crate::models::{
    DocType, NewProducer, Paginated, Pagination, Producer, ProducerChanges, ProducerFilter,
};
use crate::services::ProducerService;

/// Create producer request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProducerRequest {
    pub name: String,
    pub document: String,
    pub doc_type: String,
}

/// Partial update; `document` and `docType` go together
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProducerRequest {
    pub name: Option<String>,
    pub document: Option<String>,
    pub doc_type: Option<String>,
}

/// List filters and pagination
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProducerListParams {
    pub name: Option<String>,
    pub document: Option<String>,
    pub doc_type: Option<String>,
    pub created_at_start: Option<DateTime<Utc>>,
    pub created_at_end: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
    pub offset: Option<u64>,
}

/// Producer response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProducerResponse {
    pub id: String,
    pub name: String,
    pub document: String,
    pub doc_type: DocType,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Producer> for ProducerResponse {
    fn from(p: Producer) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name,
            document: p.document,
            doc_type: p.doc_type,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}

fn doc_type(value: Option<&str>) -> Result<Option<DocType>, ApiError> {
    Ok(non_blank(value).map(|v| v.parse::<DocType>()).transpose()?)
}

/// GET /producers - filtered, paginated list
async fn list_producers(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<ProducerListParams>,
) -> Result<Json<Paginated<ProducerResponse>>, ApiError> {
    let filter = ProducerFilter::new(
        params.name.as_deref(),
        params.document.as_deref(),
        doc_type(params.doc_type.as_deref())?,
        params.created_at_start,
        params.created_at_end,
    );
    let page = Pagination::from_query(params.limit, params.offset);

    let result = ProducerService::new(state.store.as_ref())
        .find_all(&filter, page)
        .await?;
    Ok(Json(result.map(ProducerResponse::from)))
}

/// POST /producers - create a producer
async fn create_producer(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    ValidJson(req): ValidJson<CreateProducerRequest>,
) -> Result<Response, ApiError> {
    let doc_type: DocType = req.doc_type.trim().parse()?;
    let input = NewProducer::new(&req.name, doc_type, &req.document)?;

    let producer = ProducerService::new(state.store.as_ref())
        .create(input)
        .await?;
    Ok(created(&uri, producer.id))
}

/// GET /producers/{id}
async fn get_producer(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<ProducerResponse>, ApiError> {
    let producer = ProducerService::new(state.store.as_ref())
        .find_one(id)
        .await?;
    Ok(Json(producer.into()))
}

/// PATCH|PUT /producers/{id}
async fn update_producer(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
    ValidJson(req): ValidJson<UpdateProducerRequest>,
) -> Result<Json<ProducerResponse>, ApiError> {
    let changes = ProducerChanges::new(
        req.name.as_deref(),
        doc_type(req.doc_type.as_deref())?,
        req.document.as_deref(),
    )?;

    let producer = ProducerService::new(state.store.as_ref())
        .update(id, changes)
        .await?;
    Ok(Json(producer.into()))
}

/// DELETE /producers/{id}
async fn delete_producer(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<StatusCode, ApiError> {
    ProducerService::new(state.store.as_ref())
        .remove(id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Producer routes
pub fn router() -> Router<Arc<AppState>> {
    resource(
        &["/producers", "/produtores"],
        post(create_producer).get(list_producers),
        get(get_producer)
            .patch(update_producer)
            .put(update_producer)
            .delete(delete_producer),
    )
}
