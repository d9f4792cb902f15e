use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::app::services::{self, AppServices};
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/contracts/sales", get(list_sales).post(sell_vehicle))
        .route("/contracts/leases", get(list_leases).post(lease_vehicle))
}

pub async fn sell_vehicle(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::SellRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection(rejection),
    };

    let cmd = match body.into_command() {
        Ok(cmd) => cmd,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services::run_locked(&services, move |c| c.sell(cmd)).await {
        Ok(recorded) => (StatusCode::CREATED, Json(recorded)).into_response(),
        Err(e) => errors::transaction_error_to_response(e),
    }
}

pub async fn lease_vehicle(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::LeaseRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection(rejection),
    };

    let cmd = match body.into_command() {
        Ok(cmd) => cmd,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services::run_locked(&services, move |c| c.lease(cmd)).await {
        Ok(recorded) => (StatusCode::CREATED, Json(recorded)).into_response(),
        Err(e) => errors::transaction_error_to_response(e),
    }
}

pub async fn list_sales(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.coordinator().list_sales() {
        Ok(sales) => Json(sales).into_response(),
        Err(e) => errors::transaction_error_to_response(e),
    }
}

pub async fn list_leases(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.coordinator().list_leases() {
        Ok(leases) => Json(leases).into_response(),
        Err(e) => errors::transaction_error_to_response(e),
    }
}
