use crate::http::handlers::{ops, payments};
use crate::http::middleware::admin_auth::require_internal_api_key;
use crate::http::middleware::rate_limit::{enforce, RateLimitState};
use crate::AppState;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;

/// Only the create route is rate limited; the IPN route is called by the processor.
pub fn build_router(
    state: AppState,
    internal_api_key: String,
    rate_limit: Option<RateLimitState>,
) -> Router {
    let mut checkout_routes = Router::new().route("/api/payments/create", post(payments::create_payment));
    if let Some(limit) = rate_limit {
        checkout_routes = checkout_routes.layer(from_fn_with_state(limit, enforce));
    }

    let internal_routes = Router::new()
        .route("/api/payments/:txn_id", get(payments::get_payment))
        .layer(from_fn_with_state(internal_api_key, require_internal_api_key));

    Router::new()
        .route("/health", get(payments::health))
        .route("/ops/readiness", get(ops::readiness))
        .route("/ops/liveness", get(ops::liveness))
        .route("/api/payments/ipn", post(payments::ipn))
        .merge(checkout_routes)
        .merge(internal_routes)
        .with_state(state)
}
