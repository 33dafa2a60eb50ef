//! Harvest endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{created, resource};
use crate::http::error::ApiError;
use crate::http::extractors::{ValidJson, ValidQuery, ValidUuid};
use crate::http::server::AppState;
use crate::models::{Harvest, HarvestChanges, HarvestFilter, NewHarvest, Paginated, Pagination};
use crate::services::HarvestService;

#[derive(Deserialize)]
pub struct CreateHarvestRequest {
    pub year: i32,
}

#[derive(Deserialize)]
pub struct UpdateHarvestRequest {
    pub year: Option<i32>,
}

#[derive(Deserialize)]
pub struct HarvestListParams {
    pub year: Option<i32>,
    pub limit: Option<u32>,
    pub offset: Option<u64>,
}

/// Harvest response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HarvestResponse {
    pub id: String,
    pub year: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Harvest> for HarvestResponse {
    fn from(h: Harvest) -> Self {
        Self {
            id: h.id.to_string(),
            year: h.year,
            created_at: h.created_at.to_rfc3339(),
            updated_at: h.updated_at.to_rfc3339(),
        }
    }
}

/// GET /harvests - newest year first
async fn list_harvests(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<HarvestListParams>,
) -> Result<Json<Paginated<HarvestResponse>>, ApiError> {
    let filter = HarvestFilter { year: params.year };
    let page = Pagination::from_query(params.limit, params.offset);

    let result = HarvestService::new(state.store.as_ref())
        .find_all(&filter, page)
        .await?;
    Ok(Json(result.map(HarvestResponse::from)))
}

/// POST /harvests
async fn create_harvest(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    ValidJson(req): ValidJson<CreateHarvestRequest>,
) -> Result<Response, ApiError> {
    let input = NewHarvest::new(req.year)?;
    let harvest = HarvestService::new(state.store.as_ref())
        .create(input)
        .await?;
    Ok(created(&uri, harvest.id))
}

/// GET /harvests/{id}
async fn get_harvest(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<HarvestResponse>, ApiError> {
    let harvest = HarvestService::new(state.store.as_ref())
        .find_one(id)
        .await?;
    Ok(Json(harvest.into()))
}

/// PATCH|PUT /harvests/{id}
async fn update_harvest(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
    ValidJson(req): ValidJson<UpdateHarvestRequest>,
) -> Result<Json<HarvestResponse>, ApiError> {
    let changes = HarvestChanges::new(req.year)?;
    let harvest = HarvestService::new(state.store.as_ref())
        .update(id, changes)
        .await?;
    Ok(Json(harvest.into()))
}

/// DELETE /harvests/{id} - 409 while crops reference the harvest
async fn delete_harvest(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<StatusCode, ApiError> {
    HarvestService::new(state.store.as_ref())
        .remove(id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Harvest routes
pub fn router() -> Router<Arc<AppState>> {
    resource(
        &["/harvests", "/safras"],
        post(create_harvest).get(list_harvests),
        get(get_harvest)
            .patch(update_harvest)
            .put(update_harvest)
            .delete(delete_harvest),
    )
}

#[cfg(test)]
mod tests {
    use super::super::testing;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn delete_without_crops_then_404() {
        let app = testing::app();
        let id = app.post("/harvests", json!({"year": 2024})).await.created_id();
        let uri = format!("/harvests/{}", id);

        assert_eq!(app.delete(&uri).await.status, StatusCode::NO_CONTENT);
        assert_eq!(app.get(&uri).await.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_with_crop_conflicts() {
        let app = testing::app();
        let harvest = app.post("/safras", json!({"year": 2025})).await.created_id();
        let producer = app
            .post(
                "/producers",
                json!({"name": "João", "document": "52998224725", "docType": "CPF"}),
            )
            .await
            .created_id();
        let farm = app
            .post(
                "/farms",
                json!({
                    "name": "F", "city": "Sorriso", "state": "MT",
                    "totalArea": 10.0, "arableArea": 5.0, "vegetationArea": 5.0,
                    "producerId": producer,
                }),
            )
            .await
            .created_id();
        let crop = app
            .post(
                "/crops",
                json!({"name": "Soja", "farmId": farm, "harvestId": harvest}),
            )
            .await;
        assert_eq!(crop.status, StatusCode::CREATED);

        let response = app.delete(&format!("/safras/{}", harvest)).await;
        assert_eq!(response.status, StatusCode::CONFLICT);
        assert!(response.body["message"]
            .as_str()
            .unwrap()
            .contains("associated crops"));
        assert_eq!(
            app.get(&format!("/harvests/{}", harvest)).await.status,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn year_floor_and_ordering() {
        let app = testing::app();
        assert_eq!(
            app.post("/harvests", json!({"year": 1899})).await.status,
            StatusCode::BAD_REQUEST
        );

        for year in [2022, 2024, 2023] {
            app.post("/harvests", json!({"year": year})).await;
        }
        let response = app.get("/harvests?limit=2").await;
        assert_eq!(response.body["total"], 3);
        assert_eq!(response.body["data"][0]["year"], 2024);
        assert_eq!(response.body["data"][1]["year"], 2023);

        let response = app.get("/harvests?year=2022").await;
        assert_eq!(response.body["total"], 1);
    }
}
