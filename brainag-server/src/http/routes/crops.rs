//! Crop endpoints

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
use crate::models::{Crop, CropChanges, CropFilter, NewCrop, Paginated, Pagination};
use crate::services::CropService;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCropRequest {
    pub name: String,
    pub farm_id: Uuid,
    pub harvest_id: Uuid,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCropRequest {
    pub name: Option<String>,
    pub farm_id: Option<Uuid>,
    pub harvest_id: Option<Uuid>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropListParams {
    pub name: Option<String>,
    pub farm_id: Option<Uuid>,
    pub harvest_id: Option<Uuid>,
    pub limit: Option<u32>,
    pub offset: Option<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CropResponse {
    pub id: String,
    pub name: String,
    pub farm_id: String,
    pub harvest_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Crop> for CropResponse {
    fn from(c: Crop) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name,
            farm_id: c.farm_id.to_string(),
            harvest_id: c.harvest_id.to_string(),
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

/// GET /crops
async fn list_crops(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<CropListParams>,
) -> Result<Json<Paginated<CropResponse>>, ApiError> {
    let filter = CropFilter::new(params.name.as_deref(), params.farm_id, params.harvest_id);
    let page = Pagination::from_query(params.limit, params.offset);

    let result = CropService::new(state.store.as_ref())
        .find_all(&filter, page)
        .await?;
    Ok(Json(result.map(CropResponse::from)))
}

/// POST /crops
async fn create_crop(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    ValidJson(req): ValidJson<CreateCropRequest>,
) -> Result<Response, ApiError> {
    let input = NewCrop::new(&req.name, req.farm_id, req.harvest_id)?;
    let crop = CropService::new(state.store.as_ref()).create(input).await?;
    Ok(created(&uri, crop.id))
}

/// GET /crops/{id}
async fn get_crop(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<CropResponse>, ApiError> {
    let crop = CropService::new(state.store.as_ref()).find_one(id).await?;
    Ok(Json(crop.into()))
}

/// PATCH|PUT /crops/{id}
async fn update_crop(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
    ValidJson(req): ValidJson<UpdateCropRequest>,
) -> Result<Json<CropResponse>, ApiError> {
    let changes = CropChanges::new(req.name.as_deref(), req.farm_id, req.harvest_id)?;
    let crop = CropService::new(state.store.as_ref())
        .update(id, changes)
        .await?;
    Ok(Json(crop.into()))
}

/// DELETE /crops/{id}
async fn delete_crop(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<StatusCode, ApiError> {
    CropService::new(state.store.as_ref()).remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Crop routes
pub fn router() -> Router<Arc<AppState>> {
    resource(
        &["/crops", "/culturas"],
        post(create_crop).get(list_crops),
        get(get_crop)
            .patch(update_crop)
            .put(update_crop)
            .delete(delete_crop),
    )
}

#[cfg(test)]
mod tests {
    use super::super::testing::{self, TestApp};
    use axum::http::StatusCode;
    use serde_json::json;
    use uuid::Uuid;

    async fn farm_and_harvest(app: &TestApp) -> (Uuid, Uuid) {
        let producer = app
            .post(
                "/producers",
                json!({"name": "Ana", "document": "11144477735", "docType": "CPF"}),
            )
            .await
            .created_id();
        let farm = app
            .post(
                "/farms",
                json!({
                    "name": "F", "city": "Luís Eduardo Magalhães", "state": "BA",
                    "totalArea": 300.0, "arableArea": 200.0, "vegetationArea": 80.0,
                    "producerId": producer,
                }),
            )
            .await
            .created_id();
        let harvest = app.post("/harvests", json!({"year": 2024})).await.created_id();
        (farm, harvest)
    }

    #[tokio::test]
    async fn crud_through_portuguese_alias() {
        let app = testing::app();
        let (farm, harvest) = farm_and_harvest(&app).await;

        let response = app
            .post("/culturas", json!({"name": "Algodão", "farmId": farm, "harvestId": harvest}))
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        let id = response.created_id();
        let uri = format!("/culturas/{}", id);

        let response = app.patch(&uri, json!({"name": "Soja"})).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["name"], "Soja");
        assert_eq!(response.body["farmId"], farm.to_string());

        let response = app.get(&format!("/crops?name=SOJA&farmId={}", farm)).await;
        assert_eq!(response.body["total"], 1);

        assert_eq!(app.delete(&uri).await.status, StatusCode::NO_CONTENT);
        assert_eq!(app.get(&uri).await.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_references_are_rejected() {
        let app = testing::app();
        let (farm, _) = farm_and_harvest(&app).await;

        let response = app
            .post("/crops", json!({"name": "Soja", "farmId": farm, "harvestId": Uuid::new_v4()}))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);

        let response = app
            .post("/crops", json!({"name": "Soja", "farmId": "x", "harvestId": "y"}))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);

        let response = app.post("/crops", json!({"name": "", "farmId": farm})).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }
}
