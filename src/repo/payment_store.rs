use crate::domain::payment::{NewPayment, PaymentRecord};
use crate::error::PaymentResult;

#[async_trait::async_trait]
pub trait PaymentStore: Send + Sync {
    /// Fails with `Conflict` on a duplicate `txn_id` and `Validation` on a bad amount.
    async fn insert(&self, payment: NewPayment) -> PaymentResult<PaymentRecord>;

    /// Returns the number of rows touched; 0 for an unknown `txn_id`.
    async fn update_status_by_txn_id(&self, txn_id: &str, status: &str) -> PaymentResult<u64>;

    async fn find_by_txn_id(&self, txn_id: &str) -> PaymentResult<Option<PaymentRecord>>;

    async fn ping(&self) -> PaymentResult<()>;
}
