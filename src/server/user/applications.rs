use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::dto::{CreateApplicationRequest, ListApplicationsParams};
use crate::server::response::{ApiError, ApiResponse};
use crate::tracker::{ApplicationFilter, ApplicationPatch, NewApplication};

pub async fn list_applications(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListApplicationsParams>,
) -> impl IntoResponse {
    let filter = ApplicationFilter::from(params.q.as_deref());
    let rows = state.applications.list(&auth.identity, &filter)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(rows)))
}

pub async fn create_application(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateApplicationRequest>,
) -> impl IntoResponse {
    let input = req.with_defaults(Utc::now().date_naive());
    let created = state.applications.create(&auth.identity, &input)?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

pub async fn get_application(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let row = state
        .applications
        .get(&auth.identity, &id)
        .map_err(not_found_as("Application not found"))?;

    Ok::<_, ApiError>(Json(ApiResponse::success(row)))
}

pub async fn update_application(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<ApplicationPatch>,
) -> impl IntoResponse {
    let row = state
        .applications
        .update(&auth.identity, &id, &patch)
        .map_err(not_found_as("Application not found"))?;

    Ok::<_, ApiError>(Json(ApiResponse::success(row)))
}

pub async fn replace_application(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(input): Json<NewApplication>,
) -> impl IntoResponse {
    let row = state
        .applications
        .replace(&auth.identity, &id, &input)
        .map_err(not_found_as("Application not found"))?;

    Ok::<_, ApiError>(Json(ApiResponse::success(row)))
}

pub async fn delete_application(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    state
        .applications
        .delete(&auth.identity, &id)
        .map_err(not_found_as("Application not found"))?;

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

pub async fn get_metrics(auth: RequireUser, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let metrics = state.applications.metrics(&auth.identity)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(metrics)))
}

/// Converts a domain error, giving `NotFound` a resource-specific message.
pub(super) fn not_found_as(message: &'static str) -> impl Fn(crate::error::Error) -> ApiError {
    move |err| match err {
        crate::error::Error::NotFound => ApiError::not_found(message),
        other => ApiError::from(other),
    }
}
