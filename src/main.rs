use coinpay_gateway::config::AppConfig;
use coinpay_gateway::gateways::coinpayments::CoinPaymentsGateway;
use coinpay_gateway::gateways::mock::MockGateway;
use coinpay_gateway::gateways::PaymentGateway;
use coinpay_gateway::http::middleware::rate_limit::RateLimitState;
use coinpay_gateway::http::router::build_router;
use coinpay_gateway::repo::payment_store::PaymentStore;
use coinpay_gateway::repo::payments_repo::PaymentsRepo;
use coinpay_gateway::service::ipn_service::IpnService;
use coinpay_gateway::service::ipn_verifier::IpnVerifier;
use coinpay_gateway::service::payment_service::PaymentService;
use coinpay_gateway::service::status_updater::StatusUpdater;
use coinpay_gateway::AppState;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::load();
    if cfg.processor.ipn_secret.is_empty() {
        tracing::warn!("COINPAYMENTS_IPN_SECRET is empty; every notification will be rejected");
    }

    let pool = PgPoolOptions::new()
        .max_connections(cfg.db_max_connections)
        .connect(&cfg.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("migrations applied");

    let store: Arc<dyn PaymentStore> = Arc::new(PaymentsRepo { pool: pool.clone() });

    let gateway: Arc<dyn PaymentGateway> = match cfg.processor.adapter.as_str() {
        "MOCK" => {
            tracing::warn!("using mock payment gateway");
            Arc::new(MockGateway::new("ALWAYS_SUCCESS"))
        }
        _ => Arc::new(CoinPaymentsGateway {
            api_url: cfg.processor.api_url.clone(),
            public_key: cfg.processor.public_key.clone(),
            private_key: cfg.processor.private_key.clone(),
            timeout_ms: cfg.processor.timeout_ms,
            client: reqwest::Client::new(),
        }),
    };

    let payment_service = PaymentService {
        store: store.clone(),
        gateway,
        default_currency: cfg.processor.default_currency.clone(),
        ipn_url: cfg.processor.ipn_url.clone(),
    };

    let ipn_service = IpnService {
        verifier: IpnVerifier::new(cfg.processor.ipn_secret.clone()),
        updater: StatusUpdater {
            store: store.clone(),
        },
        merchant_id: cfg.processor.merchant_id.clone(),
    };

    let redis_client = redis::Client::open(cfg.redis_url.clone())?;

    let state = AppState {
        payment_service,
        ipn_service,
        store,
        redis_client: Some(redis_client.clone()),
    };

    let app = build_router(
        state,
        cfg.internal_api_key.clone(),
        Some(RateLimitState {
            redis_client,
            max_per_minute: cfg.rate_limit_per_minute,
            scope: "create",
        }),
    );

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
