use crate::error::{PaymentError, PaymentResult};
use crate::gateways::{GatewayRequest, GatewayResult, PaymentGateway};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Local stand-in for the processor, selected with `GATEWAY_ADAPTER=MOCK`.
pub struct MockGateway {
    pub behavior: String,
    /// When set every call reports this id, which lets tests force collisions.
    pub fixed_txn_id: Option<String>,
    calls: AtomicUsize,
    last_request: Mutex<Option<GatewayRequest>>,
}

impl MockGateway {
    pub fn new(behavior: &str) -> Self {
        Self {
            behavior: behavior.to_string(),
            fixed_txn_id: None,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn with_fixed_txn_id(mut self, txn_id: &str) -> Self {
        self.fixed_txn_id = Some(txn_id.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<GatewayRequest> {
        self.last_request.lock().ok().and_then(|g| g.clone())
    }
}

#[async_trait::async_trait]
impl PaymentGateway for MockGateway {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_transaction(&self, request: GatewayRequest) -> PaymentResult<GatewayResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }

        match self.behavior.as_str() {
            "ALWAYS_FAILURE" => Err(PaymentError::Upstream("mock decline".to_string())),
            "ALWAYS_TIMEOUT" => Err(PaymentError::Upstream("mock timeout".to_string())),
            _ => {
                let txn_id = self
                    .fixed_txn_id
                    .clone()
                    .unwrap_or_else(|| format!("mock_txn_{}", uuid::Uuid::new_v4().simple()));
                let payload = json!({
                    "error": "ok",
                    "result": {
                        "amount": request.amount.normalize().to_string(),
                        "txn_id": txn_id,
                        "address": "mock-address",
                        "confirms_needed": "1",
                        "timeout": 3600,
                        "checkout_url": format!("https://mock.invalid/checkout/{txn_id}"),
                        "status_url": format!("https://mock.invalid/status/{txn_id}"),
                    }
                });

                Ok(GatewayResult {
                    gateway_used: self.name().to_string(),
                    transaction_id: txn_id,
                    payload,
                })
            }
        }
    }
}
