use crate::error::PaymentResult;
use rust_decimal::Decimal;

pub mod coinpayments;
pub mod mock;

#[derive(Debug, Clone)]
pub struct GatewayRequest {
    pub amount: Decimal,
    pub currency: String,
    pub item_name: String,
    pub buyer_email: String,
    /// Always taken from server configuration.
    pub ipn_url: String,
}

#[derive(Debug, Clone)]
pub struct GatewayResult {
    pub gateway_used: String,
    pub transaction_id: String,
    /// Creation payload exactly as the processor returned it.
    pub payload: serde_json::Value,
}

#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync {
    fn name(&self) -> &'static str;

    async fn create_transaction(&self, request: GatewayRequest) -> PaymentResult<GatewayResult>;
}
