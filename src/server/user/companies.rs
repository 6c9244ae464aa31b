use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use super::applications::not_found_as;
use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::dto::DeleteCompanyParams;
use crate::server::response::{ApiError, ApiResponse};
use crate::tracker::{CompanyPatch, NewCompany};

pub async fn list_companies(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let companies = state.companies.list(&auth.identity)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(companies)))
}

pub async fn create_company(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewCompany>,
) -> impl IntoResponse {
    let company = state.companies.create(&auth.identity, &req)?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(company))))
}

pub async fn get_company(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let company = state
        .companies
        .get(&auth.identity, &id)
        .map_err(not_found_as("Company not found"))?;

    Ok::<_, ApiError>(Json(ApiResponse::success(company)))
}

pub async fn update_company(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<CompanyPatch>,
) -> impl IntoResponse {
    let company = state
        .companies
        .update(&auth.identity, &id, &patch)
        .map_err(not_found_as("Company not found"))?;

    Ok::<_, ApiError>(Json(ApiResponse::success(company)))
}

pub async fn delete_company(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<DeleteCompanyParams>,
) -> impl IntoResponse {
    state
        .companies
        .delete(&auth.identity, &id, params.force == Some(true))
        .map_err(not_found_as("Company not found"))?;

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
