use crate::domain::payment::IpnNotification;
use crate::error::{PaymentError, PaymentResult};
use crate::service::ipn_verifier::IpnVerifier;
use crate::service::status_updater::{ApplyOutcome, StatusUpdater};

const STATUS_MAX_LEN: usize = 50;

#[derive(Clone)]
pub struct IpnService {
    pub verifier: IpnVerifier,
    pub updater: StatusUpdater,
    pub merchant_id: String,
}

impl IpnService {
    /// Verifies `raw_body` against `signature`, then applies the reported status.
    /// Nothing is parsed or written when verification fails.
    pub async fn process(
        &self,
        raw_body: &[u8],
        signature: Option<&str>,
        content_type: Option<&str>,
    ) -> PaymentResult<ApplyOutcome> {
        if !self.verifier.verify(raw_body, signature.unwrap_or("")) {
            tracing::warn!(
                has_signature = signature.is_some(),
                body_len = raw_body.len(),
                "rejected notification with bad signature"
            );
            return Err(PaymentError::Authentication);
        }

        let notification = parse_notification(raw_body, content_type)?;

        if !self.merchant_id.is_empty() {
            if let Some(merchant) = notification.merchant.as_deref() {
                if merchant != self.merchant_id {
                    tracing::warn!(
                        txn_id = %notification.txn_id,
                        "notification names a different merchant"
                    );
                }
            }
        }

        tracing::debug!(
            txn_id = %notification.txn_id,
            status = %notification.status,
            status_text = notification.status_text.as_deref().unwrap_or(""),
            "verified notification"
        );
        self.updater
            .apply(&notification.txn_id, &notification.status)
            .await
    }
}

/// Form-encoded unless the sender declares JSON.
pub fn parse_notification(raw_body: &[u8], content_type: Option<&str>) -> PaymentResult<IpnNotification> {
    let is_json = content_type
        .map(|ct| ct.trim().to_ascii_lowercase().starts_with("application/json"))
        .unwrap_or(false);

    let notification: IpnNotification = if is_json {
        serde_json::from_slice(raw_body)
            .map_err(|e| PaymentError::Validation(format!("malformed notification: {e}")))?
    } else {
        serde_urlencoded::from_bytes(raw_body)
            .map_err(|e| PaymentError::Validation(format!("malformed notification: {e}")))?
    };

    if notification.txn_id.trim().is_empty() {
        return Err(PaymentError::Validation("notification has empty txn_id".to_string()));
    }
    if notification.status.is_empty() || notification.status.chars().count() > STATUS_MAX_LEN {
        return Err(PaymentError::Validation("notification status is invalid".to_string()));
    }
    Ok(notification)
}
