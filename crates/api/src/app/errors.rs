use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use dealership_core::DomainError;
use dealership_infra::TransactionError;

pub fn transaction_error_to_response(err: TransactionError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        TransactionError::NotFound(_) => json_error(StatusCode::NOT_FOUND, "not_found", message),
        TransactionError::DuplicateVin(_) => {
            json_error(StatusCode::CONFLICT, "duplicate_vin", message)
        }
        TransactionError::InvalidRange { .. } => {
            json_error(StatusCode::BAD_REQUEST, "invalid_range", message)
        }
        TransactionError::VehicleUnavailable(_) => {
            json_error(StatusCode::LOCKED, "vehicle_unavailable", message)
        }
        TransactionError::Validation(_) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "validation_error", message)
        }
        TransactionError::Ledger(_) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "ledger_error", message)
        }
        TransactionError::RollbackFailed { .. } => {
            tracing::error!(error = %message, "rollback failed; lot and ledger may disagree");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "rollback_failed", message)
        }
        TransactionError::Storage(_) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", message)
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    transaction_error_to_response(err.into())
}

pub fn json_rejection(rejection: JsonRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_body", rejection.body_text())
}

pub fn query_rejection(rejection: QueryRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_query", rejection.body_text())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
