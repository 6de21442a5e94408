use crate::domain::payment::{CreatePaymentRequest, ErrorEnvelope, ErrorPayload};
use crate::error::PaymentError;
use crate::repo::payment_store::PaymentStore;
use crate::service::ipn_verifier::SIGNATURE_HEADER;
use crate::AppState;
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

pub const CREATE_FAILED_MESSAGE: &str = "Failed to create transaction";

pub async fn create_payment(
    State(state): State<AppState>,
    payload: Result<Json<CreatePaymentRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(req) = match payload {
        Ok(p) => p,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(err("INVALID_REQUEST", &rejection.body_text())),
            )
                .into_response()
        }
    };

    match state.payment_service.create_payment(req).await {
        Ok(processor_payload) => (StatusCode::OK, Json(processor_payload)).into_response(),
        Err(PaymentError::Validation(msg)) => {
            (StatusCode::BAD_REQUEST, Json(err("INVALID_REQUEST", &msg))).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "payment creation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(err("TRANSACTION_FAILED", CREATE_FAILED_MESSAGE)),
            )
                .into_response()
        }
    }
}

/// Processor callback. Takes the body as raw bytes so the signature is checked
/// against exactly what was sent.
pub async fn ipn(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    let signature = headers.get(SIGNATURE_HEADER).and_then(|h| h.to_str().ok());
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok());

    match state.ipn_service.process(&body, signature, content_type).await {
        Ok(_) => (StatusCode::OK, "OK"),
        Err(PaymentError::Authentication) => (StatusCode::FORBIDDEN, "Invalid IPN"),
        Err(PaymentError::Validation(msg)) => {
            tracing::warn!(reason = %msg, "verified notification could not be read");
            (StatusCode::BAD_REQUEST, "Invalid IPN payload")
        }
        Err(e) => {
            tracing::error!(error = %e, "notification not applied");
            (StatusCode::INTERNAL_SERVER_ERROR, "error")
        }
    }
}

pub async fn get_payment(State(state): State<AppState>, Path(txn_id): Path<String>) -> impl IntoResponse {
    match state.store.find_by_txn_id(&txn_id).await {
        Ok(Some(record)) => (StatusCode::OK, Json(record)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(err("PAYMENT_NOT_FOUND", "no payment with this txn_id")),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, txn_id = %txn_id, "payment lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(err("INTERNAL_ERROR", "lookup failed")),
            )
                .into_response()
        }
    }
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

fn err(code: &str, message: &str) -> ErrorEnvelope {
    ErrorEnvelope {
        error: ErrorPayload {
            code: code.to_string(),
            message: message.to_string(),
            details: None,
        },
    }
}
