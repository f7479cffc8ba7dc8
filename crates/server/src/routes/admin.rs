//! Admin panel endpoints: unfiltered reads plus create, patch, delete and
//! visibility toggles for every content table.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use models::{
    client_logo, project, project_feedback, project_gallery, project_metric, service, sub_service, testimonial,
    Editable, Visible,
};
use serde::Deserialize;
use ::service::catalog::{GalleryItem, ServiceNode};
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::startup::AppState;

#[derive(Debug, Deserialize)]
pub struct GalleryQuery {
    pub project_id: Option<Uuid>,
}

pub async fn catalog(State(state): State<AppState>) -> Result<Json<Vec<ServiceNode>>, JsonApiError> {
    Ok(Json(state.catalog.load_catalog(false).await?))
}

pub async fn gallery(
    State(state): State<AppState>,
    Query(q): Query<GalleryQuery>,
) -> Result<Json<Vec<GalleryItem>>, JsonApiError> {
    Ok(Json(state.catalog.list_gallery(q.project_id, false).await?))
}

pub async fn testimonials(State(state): State<AppState>) -> Result<Json<Vec<testimonial::Model>>, JsonApiError> {
    Ok(Json(state.catalog.list_testimonials(false).await?))
}

pub async fn client_logos(State(state): State<AppState>) -> Result<Json<Vec<client_logo::Model>>, JsonApiError> {
    Ok(Json(state.catalog.list_client_logos(false).await?))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, JsonApiError> {
    payload.map(|Json(v)| v).map_err(|e| JsonApiError::bad_request(e.body_text()))
}

pub async fn get_entity<T: Editable>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<T>, JsonApiError> {
    Ok(Json(state.admin.get::<T>(id).await?))
}

pub async fn create_entity<T: Editable>(
    State(state): State<AppState>,
    payload: Result<Json<T::Create>, JsonRejection>,
) -> Result<(StatusCode, Json<T>), JsonApiError> {
    let input = body(payload)?;
    let created = state.admin.create::<T>(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_entity<T: Editable>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<T::Patch>, JsonRejection>,
) -> Result<Json<T>, JsonApiError> {
    let patch = body(payload)?;
    Ok(Json(state.admin.update::<T>(id, patch).await?))
}

pub async fn delete_entity<T: Editable>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    state.admin.delete::<T>(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_entity<T: Editable + Visible>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<T>, JsonApiError> {
    Ok(Json(state.admin.toggle_visibility::<T>(id).await?))
}

/// `POST /admin/{name}` and `GET|PATCH|DELETE /admin/{name}/:id`.
fn resource<T: Editable>(router: Router<AppState>, name: &str) -> Router<AppState> {
    router
        .route(&format!("/admin/{name}"), post(create_entity::<T>))
        .route(
            &format!("/admin/{name}/:id"),
            get(get_entity::<T>).patch(update_entity::<T>).delete(delete_entity::<T>),
        )
}

/// [`resource`] plus `POST /admin/{name}/:id/visibility`.
fn visible_resource<T: Editable + Visible>(router: Router<AppState>, name: &str) -> Router<AppState> {
    resource::<T>(router, name).route(&format!("/admin/{name}/:id/visibility"), post(toggle_entity::<T>))
}

pub fn router() -> Router<AppState> {
    let router = Router::new()
        .route("/admin/catalog", get(catalog))
        .route("/admin/gallery", get(gallery))
        .route("/admin/testimonials", get(testimonials))
        .route("/admin/client-logos", get(client_logos));

    let router = visible_resource::<service::Model>(router, "services");
    let router = visible_resource::<sub_service::Model>(router, "sub-services");
    let router = visible_resource::<project::Model>(router, "projects");
    let router = resource::<project_metric::Model>(router, "metrics");
    let router = resource::<project_feedback::Model>(router, "feedback");
    let router = visible_resource::<project_gallery::Model>(router, "gallery");
    let router = visible_resource::<testimonial::Model>(router, "testimonials");
    visible_resource::<client_logo::Model>(router, "client-logos")
}

