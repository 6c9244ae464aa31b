mod applications;
mod companies;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::server::AppState;

pub fn user_router() -> Router<Arc<AppState>> {
    Router::new()
        // Applications
        .route(
            "/applications",
            get(applications::list_applications).post(applications::create_application),
        )
        .route(
            "/applications/{id}",
            get(applications::get_application)
                .patch(applications::update_application)
                .put(applications::replace_application)
                .delete(applications::delete_application),
        )
        .route("/metrics", get(applications::get_metrics))
        // Companies
        .route("/companies", get(companies::list_companies))
        .route("/companies", post(companies::create_company))
        .route(
            "/companies/{id}",
            get(companies::get_company)
                .patch(companies::update_company)
                .delete(companies::delete_company),
        )
}
