use crate::error::{PaymentError, PaymentResult};
use crate::gateways::{GatewayRequest, GatewayResult, PaymentGateway};

pub struct CoinPaymentsGateway {
    pub api_url: String,
    pub public_key: String,
    pub private_key: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

#[async_trait::async_trait]
impl PaymentGateway for CoinPaymentsGateway {
    fn name(&self) -> &'static str {
        "coinpayments"
    }

    async fn create_transaction(&self, request: GatewayRequest) -> PaymentResult<GatewayResult> {
        let amount = request.amount.normalize().to_string();
        let form = [
            ("version", "1"),
            ("cmd", "create_transaction"),
            ("format", "json"),
            ("amount", amount.as_str()),
            ("currency1", request.currency.as_str()),
            ("currency2", request.currency.as_str()),
            ("buyer_email", request.buyer_email.as_str()),
            ("item_name", request.item_name.as_str()),
            ("ipn_url", request.ipn_url.as_str()),
        ];

        let resp = self
            .client
            .post(&self.api_url)
            .basic_auth(&self.public_key, Some(&self.private_key))
            .form(&form)
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await;

        match resp {
            Ok(r) if r.status().is_success() => {
                let v: serde_json::Value = r
                    .json()
                    .await
                    .map_err(|e| PaymentError::Upstream(format!("unreadable response: {e}")))?;
                parse_create_response(v, self.name())
            }
            Ok(r) => {
                let status = r.status();
                let body = r.text().await.unwrap_or_default();
                Err(PaymentError::Upstream(format!(
                    "HTTP_{}: {}",
                    status.as_u16(),
                    body.chars().take(200).collect::<String>()
                )))
            }
            Err(e) if e.is_timeout() => Err(PaymentError::Upstream("gateway timeout".to_string())),
            Err(e) => Err(PaymentError::Upstream(format!("network error: {e}"))),
        }
    }
}

/// The API answers 200 even for rejected calls; `error` is `"ok"` only on success.
pub fn parse_create_response(v: serde_json::Value, gateway: &str) -> PaymentResult<GatewayResult> {
    let outcome = v.get("error").and_then(|e| e.as_str()).unwrap_or("");
    if outcome != "ok" {
        let reason = if outcome.is_empty() { "missing error field" } else { outcome };
        return Err(PaymentError::Upstream(reason.chars().take(200).collect()));
    }

    let transaction_id = v
        .pointer("/result/txn_id")
        .and_then(|id| id.as_str())
        .filter(|id| !id.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| PaymentError::Upstream("response has no result.txn_id".to_string()))?;

    Ok(GatewayResult {
        gateway_used: gateway.to_string(),
        transaction_id,
        payload: v,
    })
}
