//! Visible-only reads for the marketing site.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use models::{client_logo, testimonial};
use service::catalog::{GalleryItem, ServiceNode};
use tracing::debug;
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::startup::AppState;

pub async fn catalog(State(state): State<AppState>) -> Result<Json<Vec<ServiceNode>>, JsonApiError> {
    let tree = state.catalog.load_catalog(true).await?;
    debug!(services = tree.len(), "public catalog");
    Ok(Json(tree))
}

pub async fn gallery(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<Vec<GalleryItem>>, JsonApiError> {
    Ok(Json(state.catalog.load_gallery(project_id, true).await?))
}

pub async fn testimonials(State(state): State<AppState>) -> Result<Json<Vec<testimonial::Model>>, JsonApiError> {
    Ok(Json(state.catalog.list_testimonials(true).await?))
}

pub async fn client_logos(State(state): State<AppState>) -> Result<Json<Vec<client_logo::Model>>, JsonApiError> {
    Ok(Json(state.catalog.list_client_logos(true).await?))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/catalog", get(catalog))
        .route("/api/projects/:id/gallery", get(gallery))
        .route("/api/testimonials", get(testimonials))
        .route("/api/client-logos", get(client_logos))
}
