pub mod config;
pub mod domain {
    pub mod payment;
}
pub mod error;
pub mod gateways;
pub mod http {
    pub mod handlers {
        pub mod ops;
        pub mod payments;
    }
    pub mod middleware {
        pub mod admin_auth;
        pub mod rate_limit;
    }
    pub mod router;
}
pub mod repo {
    pub mod memory_store;
    pub mod payment_store;
    pub mod payments_repo;
}
pub mod service {
    pub mod ipn_service;
    pub mod ipn_verifier;
    pub mod payment_service;
    pub mod status_updater;
}

use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub payment_service: service::payment_service::PaymentService,
    pub ipn_service: service::ipn_service::IpnService,
    pub store: Arc<dyn repo::payment_store::PaymentStore>,
    /// `None` skips the Redis check in readiness.
    pub redis_client: Option<redis::Client>,
}
