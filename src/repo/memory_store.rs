use crate::domain::payment::{validate_amount, NewPayment, PaymentRecord};
use crate::error::{PaymentError, PaymentResult};
use crate::repo::payment_store::PaymentStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    next_id: i64,
    by_txn_id: HashMap<String, PaymentRecord>,
}

/// Process-local store with the same contract as the Postgres repo.
///
/// The duplicate check and the insert happen under one write lock, so racing
/// inserts for the same `txn_id` resolve to exactly one record.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.by_txn_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait::async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn insert(&self, payment: NewPayment) -> PaymentResult<PaymentRecord> {
        validate_amount(payment.amount).map_err(PaymentError::Validation)?;

        let mut inner = self.inner.write().await;
        if inner.by_txn_id.contains_key(&payment.txn_id) {
            return Err(PaymentError::Conflict(payment.txn_id));
        }

        inner.next_id += 1;
        let record = PaymentRecord {
            id: inner.next_id,
            txn_id: payment.txn_id,
            amount: payment.amount,
            currency: payment.currency,
            status: payment.status,
            email: payment.email,
            created_at: chrono::Utc::now(),
        };
        inner
            .by_txn_id
            .insert(record.txn_id.clone(), record.clone());
        Ok(record)
    }

    async fn update_status_by_txn_id(&self, txn_id: &str, status: &str) -> PaymentResult<u64> {
        let mut inner = self.inner.write().await;
        match inner.by_txn_id.get_mut(txn_id) {
            Some(record) => {
                record.status = status.to_string();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn find_by_txn_id(&self, txn_id: &str) -> PaymentResult<Option<PaymentRecord>> {
        Ok(self.inner.read().await.by_txn_id.get(txn_id).cloned())
    }

    async fn ping(&self) -> PaymentResult<()> {
        Ok(())
    }
}
