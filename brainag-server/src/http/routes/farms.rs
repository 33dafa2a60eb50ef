//! Farm endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{created, resource};
use crate::http::error::ApiError;
use crate::http::extractors::{ValidJson, ValidQuery, ValidUuid};
use crate::http::server::AppState;
use crate::models::{Farm, FarmChanges, FarmFilter, LandAreas, NewFarm, Paginated, Pagination};
use crate::services::FarmService;

/// Create farm request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFarmRequest {
    pub name: String,
    pub city: String,
    pub state: String,
    pub total_area: f64,
    pub arable_area: f64,
    pub vegetation_area: f64,
    pub producer_id: Uuid,
}

/// Partial update request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFarmRequest {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub total_area: Option<f64>,
    pub arable_area: Option<f64>,
    pub vegetation_area: Option<f64>,
    pub producer_id: Option<Uuid>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmListParams {
    pub producer_id: Option<Uuid>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u64>,
}

/// Farm response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmResponse {
    pub id: String,
    pub name: String,
    pub city: String,
    pub state: String,
    pub total_area: f64,
    pub arable_area: f64,
    pub vegetation_area: f64,
    pub producer_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Farm> for FarmResponse {
    fn from(f: Farm) -> Self {
        Self {
            id: f.id.to_string(),
            name: f.name,
            city: f.city,
            state: f.state,
            total_area: f.total_area,
            arable_area: f.arable_area,
            vegetation_area: f.vegetation_area,
            producer_id: f.producer_id.to_string(),
            created_at: f.created_at.to_rfc3339(),
            updated_at: f.updated_at.to_rfc3339(),
        }
    }
}

/// GET /farms
async fn list_farms(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<FarmListParams>,
) -> Result<Json<Paginated<FarmResponse>>, ApiError> {
    let filter = FarmFilter::new(
        params.producer_id,
        params.city.as_deref(),
        params.state.as_deref(),
    );
    let page = Pagination::from_query(params.limit, params.offset);

    let result = FarmService::new(state.store.as_ref())
        .find_all(&filter, page)
        .await?;
    Ok(Json(result.map(FarmResponse::from)))
}

/// POST /farms
async fn create_farm(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    ValidJson(req): ValidJson<CreateFarmRequest>,
) -> Result<Response, ApiError> {
    let input = NewFarm::new(
        &req.name,
        &req.city,
        &req.state,
        LandAreas::new(req.total_area, req.arable_area, req.vegetation_area),
        req.producer_id,
    )?;

    let farm = FarmService::new(state.store.as_ref()).create(input).await?;
    Ok(created(&uri, farm.id))
}

/// GET /farms/{id}
async fn get_farm(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<FarmResponse>, ApiError> {
    let farm = FarmService::new(state.store.as_ref()).find_one(id).await?;
    Ok(Json(farm.into()))
}

/// PATCH|PUT /farms/{id}
async fn update_farm(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
    ValidJson(req): ValidJson<UpdateFarmRequest>,
) -> Result<Json<FarmResponse>, ApiError> {
    let changes = FarmChanges {
        name: req.name,
        city: req.city,
        state: req.state,
        total_area: req.total_area,
        arable_area: req.arable_area,
        vegetation_area: req.vegetation_area,
        producer_id: req.producer_id,
    }
    .validated()?;

    let farm = FarmService::new(state.store.as_ref())
        .update(id, changes)
        .await?;
    Ok(Json(farm.into()))
}

/// DELETE /farms/{id} - 409 while crops reference the farm
async fn delete_farm(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<StatusCode, ApiError> {
    FarmService::new(state.store.as_ref()).remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Farm routes
pub fn router() -> Router<Arc<AppState>> {
    resource(
        &["/farms", "/fazendas"],
        post(create_farm).get(list_farms),
        get(get_farm)
            .patch(update_farm)
            .put(update_farm)
            .delete(delete_farm),
    )
}
