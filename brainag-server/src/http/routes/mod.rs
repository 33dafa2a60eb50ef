//! Route handlers organized by resource
//!
//! Every resource is mounted under its English path and a Portuguese alias.

pub mod crops;
pub mod dashboard;
pub mod farms;
pub mod harvests;
pub mod health;
pub mod producers;

use std::sync::Arc;

use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::MethodRouter;
use axum::Router;
use uuid::Uuid;

use super::server::AppState;

/// `201 Created` with an empty body and a `Location` under the requested path.
pub(crate) fn created(uri: &Uri, id: Uuid) -> Response {
    let location = format!("{}/{}", uri.path().trim_end_matches('/'), id);
    (StatusCode::CREATED, [(header::LOCATION, location)]).into_response()
}

/// Mount collection and member routes under every alias.
pub(crate) fn resource(
    paths: &[&str],
    collection: MethodRouter<Arc<AppState>>,
    member: MethodRouter<Arc<AppState>>,
) -> Router<Arc<AppState>> {
    paths.iter().fold(Router::new(), |router, path| {
        router
            .route(path, collection.clone())
            .route(&format!("{path}/{{id}}"), member.clone())
    })
}
