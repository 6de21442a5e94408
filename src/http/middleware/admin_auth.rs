use crate::domain::payment::{ErrorEnvelope, ErrorPayload};
use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

pub const INTERNAL_KEY_HEADER: &str = "X-Internal-Api-Key";

/// Guards the internal lookup routes. An empty configured key locks them entirely.
pub async fn require_internal_api_key(
    State(expected): State<String>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key_matches = request
        .headers()
        .get(INTERNAL_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|provided| !expected.is_empty() && provided == expected);

    if !key_matches {
        tracing::warn!(path = %request.uri().path(), "internal route called without valid key");
        let body = ErrorEnvelope {
            error: ErrorPayload {
                code: "UNAUTHORIZED".to_string(),
                message: format!("missing or invalid {INTERNAL_KEY_HEADER}"),
                details: None,
            },
        };
        return (StatusCode::UNAUTHORIZED, Json(body)).into_response();
    }

    next.run(request).await
}
