use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use redis::AsyncCommands;

/// Fixed one-minute window per client IP, counted in Redis.
#[derive(Clone)]
pub struct RateLimitState {
    pub redis_client: redis::Client,
    pub max_per_minute: i64,
    pub scope: &'static str,
}

pub async fn enforce(
    State(state): State<RateLimitState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let ip = client_ip(request.headers());
    let key = window_key(state.scope, &ip, chrono::Utc::now());

    // Redis being down must not take checkout down with it.
    if let Ok(mut conn) = state.redis_client.get_multiplexed_async_connection().await {
        let count: i64 = conn.incr(&key, 1).await.unwrap_or(1);
        let _: bool = conn.expire(&key, 120).await.unwrap_or(false);
        if count > state.max_per_minute {
            tracing::warn!(ip = %ip, scope = state.scope, count, "rate limit exceeded");
            return Response::builder()
                .status(StatusCode::TOO_MANY_REQUESTS)
                .body(Body::from("rate limit exceeded"))
                .unwrap_or_else(|_| Response::new(Body::from("rate limit exceeded")));
        }
    }

    next.run(request).await
}

/// First hop of `x-forwarded-for`, as set by the hosting proxy.
pub fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

pub fn window_key(scope: &str, ip: &str, now: chrono::DateTime<chrono::Utc>) -> String {
    format!("rate:{}:{}:{}", scope, ip, now.format("%Y%m%d%H%M"))
}
