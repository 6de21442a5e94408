#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use coinpay_gateway::gateways::mock::MockGateway;
use coinpay_gateway::http::router::build_router;
use coinpay_gateway::repo::memory_store::InMemoryPaymentStore;
use coinpay_gateway::service::ipn_service::IpnService;
use coinpay_gateway::service::ipn_verifier::IpnVerifier;
use coinpay_gateway::service::payment_service::PaymentService;
use coinpay_gateway::service::status_updater::StatusUpdater;
use coinpay_gateway::AppState;
use std::sync::Arc;
use tower::ServiceExt;

pub const IPN_SECRET: &str = "supersecretipn123";
pub const ADMIN_KEY: &str = "test-internal-key";
pub const IPN_URL: &str = "https://universal.example/api/payments/ipn";

pub struct TestApp {
    pub router: Router,
    pub store: InMemoryPaymentStore,
    pub gateway: Arc<MockGateway>,
    pub verifier: IpnVerifier,
}

pub fn app_with(gateway: MockGateway) -> TestApp {
    let store = InMemoryPaymentStore::new();
    let gateway = Arc::new(gateway);
    let verifier = IpnVerifier::new(IPN_SECRET);

    let state = AppState {
        payment_service: PaymentService {
            store: Arc::new(store.clone()),
            gateway: gateway.clone(),
            default_currency: "USDT".to_string(),
            ipn_url: IPN_URL.to_string(),
        },
        ipn_service: IpnService {
            verifier: verifier.clone(),
            updater: StatusUpdater {
                store: Arc::new(store.clone()),
            },
            merchant_id: "merchant-1".to_string(),
        },
        store: Arc::new(store.clone()),
        redis_client: None,
    };

    TestApp {
        router: build_router(state, ADMIN_KEY.to_string(), None),
        store,
        gateway,
        verifier,
    }
}

pub async fn send(router: &Router, req: Request<Body>) -> (u16, String) {
    let resp: Response<Body> = router.clone().oneshot(req).await.unwrap();
    let status = resp.status().as_u16();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

pub fn create_request(json: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/payments/create")
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

pub fn ipn_request(body: &[u8], content_type: &str, signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/payments/ipn")
        .header("content-type", content_type);
    if let Some(sig) = signature {
        builder = builder.header("HMAC", sig);
    }
    builder.body(Body::from(body.to_vec())).unwrap()
}

pub fn lookup_request(txn_id: &str, key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(format!("/api/payments/{txn_id}"));
    if let Some(k) = key {
        builder = builder.header("X-Internal-Api-Key", k);
    }
    builder.body(Body::empty()).unwrap()
}
