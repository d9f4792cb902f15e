use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use dealership_core::Vin;
use dealership_inventory::VehicleQuery;

use crate::app::services::{self, AppServices};
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/inventory", get(list_all).post(add_vehicle))
        .route("/inventory/search", get(search))
        .route("/inventory/vin/:vin", get(get_by_vin).delete(remove_vehicle))
        .route("/inventory/price", get(by_price))
        .route("/inventory/year", get(by_year))
        .route("/inventory/mileage", get(by_mileage))
        .route("/inventory/color/:color", get(by_color))
        .route("/inventory/type/:vehicle_type", get(by_vehicle_type))
        .route("/inventory/make/:make", get(by_make))
        .route("/inventory/model/:model", get(by_model))
        .route("/inventory/make/:make/model/:model", get(by_make_and_model))
}

fn parse_vin(raw: &str) -> Result<Vin, axum::response::Response> {
    raw.parse()
        .map_err(|e: dealership_core::DomainError| {
            errors::json_error(StatusCode::BAD_REQUEST, "invalid_vin", e.to_string())
        })
}

fn run_query(services: &AppServices, query: VehicleQuery) -> axum::response::Response {
    match services.coordinator().query(&query) {
        Ok(vehicles) => Json(vehicles).into_response(),
        Err(e) => errors::transaction_error_to_response(e),
    }
}

pub async fn list_all(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.coordinator().list_all() {
        Ok(vehicles) => Json(vehicles).into_response(),
        Err(e) => errors::transaction_error_to_response(e),
    }
}

pub async fn add_vehicle(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::AddVehicleRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection(rejection),
    };

    let (draft, vin) = match body.into_parts() {
        Ok(parts) => parts,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services::run_locked(&services, move |c| c.add_vehicle(&draft, vin)).await {
        Ok(vehicle) => (StatusCode::CREATED, Json(vehicle)).into_response(),
        Err(e) => errors::transaction_error_to_response(e),
    }
}

pub async fn get_by_vin(
    Extension(services): Extension<Arc<AppServices>>,
    Path(vin): Path<String>,
) -> axum::response::Response {
    let vin = match parse_vin(&vin) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services::run_locked(&services, move |c| c.find_by_vin(vin)).await {
        Ok(vehicle) => Json(vehicle).into_response(),
        Err(e) => errors::transaction_error_to_response(e),
    }
}

pub async fn remove_vehicle(
    Extension(services): Extension<Arc<AppServices>>,
    Path(vin): Path<String>,
) -> axum::response::Response {
    let vin = match parse_vin(&vin) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services::run_locked(&services, move |c| c.remove_vehicle(vin)).await {
        Ok(vehicle) => Json(vehicle).into_response(),
        Err(e) => errors::transaction_error_to_response(e),
    }
}

pub async fn search(
    Extension(services): Extension<Arc<AppServices>>,
    params: Result<Query<dto::SearchParams>, QueryRejection>,
) -> axum::response::Response {
    match params {
        Ok(Query(params)) => run_query(&services, params.into_query()),
        Err(rejection) => errors::query_rejection(rejection),
    }
}

pub async fn by_price(
    Extension(services): Extension<Arc<AppServices>>,
    params: Result<Query<dto::RangeParams<u64>>, QueryRejection>,
) -> axum::response::Response {
    match params {
        Ok(Query(r)) => run_query(&services, VehicleQuery::all().price(r.min, r.max)),
        Err(rejection) => errors::query_rejection(rejection),
    }
}

pub async fn by_year(
    Extension(services): Extension<Arc<AppServices>>,
    params: Result<Query<dto::RangeParams<u16>>, QueryRejection>,
) -> axum::response::Response {
    match params {
        Ok(Query(r)) => run_query(&services, VehicleQuery::all().year(r.min, r.max)),
        Err(rejection) => errors::query_rejection(rejection),
    }
}

pub async fn by_mileage(
    Extension(services): Extension<Arc<AppServices>>,
    params: Result<Query<dto::RangeParams<u64>>, QueryRejection>,
) -> axum::response::Response {
    match params {
        Ok(Query(r)) => run_query(&services, VehicleQuery::all().mileage(r.min, r.max)),
        Err(rejection) => errors::query_rejection(rejection),
    }
}

pub async fn by_color(
    Extension(services): Extension<Arc<AppServices>>,
    Path(color): Path<String>,
) -> axum::response::Response {
    run_query(&services, VehicleQuery::all().color(color))
}

pub async fn by_vehicle_type(
    Extension(services): Extension<Arc<AppServices>>,
    Path(vehicle_type): Path<String>,
) -> axum::response::Response {
    run_query(&services, VehicleQuery::all().vehicle_type(vehicle_type))
}

pub async fn by_make(
    Extension(services): Extension<Arc<AppServices>>,
    Path(make): Path<String>,
) -> axum::response::Response {
    run_query(&services, VehicleQuery::all().make(make))
}

pub async fn by_model(
    Extension(services): Extension<Arc<AppServices>>,
    Path(model): Path<String>,
) -> axum::response::Response {
    run_query(&services, VehicleQuery::all().model(model))
}

pub async fn by_make_and_model(
    Extension(services): Extension<Arc<AppServices>>,
    Path((make, model)): Path<(String, String)>,
) -> axum::response::Response {
    run_query(&services, VehicleQuery::all().make_and_model(make, model))
}
