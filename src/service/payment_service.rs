use crate::domain::payment::{validate_amount, CreatePaymentRequest, NewPayment, PENDING_STATUS};
use crate::error::{PaymentError, PaymentResult};
use crate::gateways::{GatewayRequest, PaymentGateway};
use crate::repo::payment_store::PaymentStore;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Instant;

const CURRENCY_MAX_LEN: usize = 10;

#[derive(Clone)]
pub struct PaymentService {
    pub store: Arc<dyn PaymentStore>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub default_currency: String,
    pub ipn_url: String,
}

#[derive(Debug, Clone, PartialEq)]
struct ValidatedPayment {
    amount: Decimal,
    currency: String,
    item_name: String,
    email: String,
}

impl PaymentService {
    /// Creates the remote transaction, then records it locally as `pending`.
    ///
    /// The two steps are not atomic: if the insert fails after the processor
    /// accepted the transaction, the remote side has a transaction with no
    /// local record. That case is logged with the orphaned id.
    pub async fn create_payment(&self, req: CreatePaymentRequest) -> PaymentResult<serde_json::Value> {
        let valid = validate_request(&req, &self.default_currency)?;

        let gateway_request = GatewayRequest {
            amount: valid.amount,
            currency: valid.currency.clone(),
            item_name: valid.item_name.clone(),
            buyer_email: valid.email.clone(),
            ipn_url: self.ipn_url.clone(),
        };

        let start = Instant::now();
        let result = self.gateway.create_transaction(gateway_request).await?;
        tracing::info!(
            gateway = %result.gateway_used,
            txn_id = %result.transaction_id,
            latency_ms = start.elapsed().as_millis() as u64,
            "processor transaction created"
        );

        let record = self
            .store
            .insert(NewPayment {
                txn_id: result.transaction_id.clone(),
                amount: valid.amount,
                currency: valid.currency,
                status: PENDING_STATUS.to_string(),
                email: Some(valid.email),
            })
            .await
            .map_err(|e| {
                tracing::error!(
                    txn_id = %result.transaction_id,
                    error = %e,
                    "processor transaction has no local record"
                );
                e
            })?;

        tracing::info!(id = record.id, txn_id = %record.txn_id, "payment recorded");
        Ok(result.payload)
    }
}

fn validate_request(req: &CreatePaymentRequest, default_currency: &str) -> PaymentResult<ValidatedPayment> {
    let raw_amount = req
        .amount
        .as_ref()
        .map(|a| a.as_text())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| PaymentError::Validation("amount is required".to_string()))?;
    // from_str would round past 28 significant digits and hide excess precision.
    let amount = Decimal::from_str_exact(&raw_amount)
        .map_err(|_| PaymentError::Validation(format!("amount is not a decimal: {raw_amount}")))?;
    validate_amount(amount).map_err(PaymentError::Validation)?;

    let email = req
        .email
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| PaymentError::Validation("email is required".to_string()))?;
    if !email.contains('@') {
        return Err(PaymentError::Validation("email is malformed".to_string()));
    }

    let currency = req
        .currency
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default_currency)
        .to_string();
    if currency.chars().count() > CURRENCY_MAX_LEN {
        return Err(PaymentError::Validation("currency code is too long".to_string()));
    }

    Ok(ValidatedPayment {
        amount,
        currency,
        item_name: req.item_name.clone().unwrap_or_default(),
        email: email.to_string(),
    })
}
