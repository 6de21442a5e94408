use crate::error::PaymentResult;
use crate::repo::payment_store::PaymentStore;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Updated,
    /// No record carries the id; the notification is still acknowledged.
    Unmatched,
}

/// Writes processor-reported statuses. Callers must have verified the notification.
#[derive(Clone)]
pub struct StatusUpdater {
    pub store: Arc<dyn PaymentStore>,
}

impl StatusUpdater {
    pub async fn apply(&self, txn_id: &str, status: &str) -> PaymentResult<ApplyOutcome> {
        let affected = self.store.update_status_by_txn_id(txn_id, status).await?;
        if affected == 0 {
            tracing::warn!(txn_id = %txn_id, status = %status, "notification for unknown transaction");
            return Ok(ApplyOutcome::Unmatched);
        }

        tracing::info!(txn_id = %txn_id, status = %status, "payment status updated");
        Ok(ApplyOutcome::Updated)
    }
}
