//! Dashboard endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::http::error::ApiError;
use crate::http::extractors::ValidQuery;
use crate::http::server::AppState;
use crate::models::{DashboardFilter, DashboardSummary};
use crate::services::DashboardService;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardParams {
    pub producer_id: Option<Uuid>,
    pub state: Option<String>,
    pub crop_name: Option<String>,
}

/// GET /dashboard
async fn dashboard(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<DashboardParams>,
) -> Result<Json<DashboardSummary>, ApiError> {
    let filter = DashboardFilter::new(
        params.producer_id,
        params.state.as_deref(),
        params.crop_name.as_deref(),
    );
    let summary = DashboardService::new(state.store.as_ref())
        .summary(&filter)
        .await?;
    Ok(Json(summary))
}

/// Dashboard routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/dashboard", get(dashboard))
}
