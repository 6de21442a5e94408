use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

pub const PENDING_STATUS: &str = "pending";

/// Largest number of fractional digits the `payments.amount` column stores exactly.
pub const AMOUNT_MAX_SCALE: u32 = 8;

/// `NUMERIC(20, 8)` leaves twelve integer digits, so amounts must stay below 10^12.
pub const AMOUNT_UPPER_BOUND: i64 = 1_000_000_000_000;

/// A scalar that clients send either quoted or as a bare JSON number.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

impl TextOrNumber {
    pub fn as_text(&self) -> String {
        match self {
            TextOrNumber::Text(s) => s.trim().to_string(),
            TextOrNumber::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreatePaymentRequest {
    pub amount: Option<TextOrNumber>,
    pub currency: Option<String>,
    #[serde(alias = "itemName")]
    pub item_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentRecord {
    pub id: i64,
    pub txn_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub txn_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: String,
    pub email: Option<String>,
}

/// Fields read from a verified IPN body. The processor sends more; only these drive state.
#[derive(Debug, Clone, Deserialize)]
pub struct IpnNotification {
    #[serde(alias = "transactionId")]
    pub txn_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub status: String,
    #[serde(default)]
    pub status_text: Option<String>,
    #[serde(default)]
    pub merchant: Option<String>,
}

// JSON notifications may carry numeric status codes; form bodies are always text.
fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(TextOrNumber::deserialize(d)?.as_text())
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorPayload,
}

#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

/// Rejects amounts that are not positive or that carry more precision than the store keeps.
pub fn validate_amount(amount: Decimal) -> Result<(), String> {
    if amount <= Decimal::ZERO {
        return Err("amount must be > 0".to_string());
    }
    if amount >= Decimal::from(AMOUNT_UPPER_BOUND) {
        return Err(format!("amount must be below {AMOUNT_UPPER_BOUND}"));
    }
    if amount.normalize().scale() > AMOUNT_MAX_SCALE {
        return Err(format!(
            "amount supports at most {AMOUNT_MAX_SCALE} fractional digits"
        ));
    }
    Ok(())
}
