use crate::domain::payment::{validate_amount, NewPayment, PaymentRecord};
use crate::error::{PaymentError, PaymentResult};
use crate::repo::payment_store::PaymentStore;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

#[derive(Clone)]
pub struct PaymentsRepo {
    pub pool: PgPool,
}

fn map_row(r: PgRow) -> PaymentRecord {
    PaymentRecord {
        id: r.get("id"),
        txn_id: r.get("txn_id"),
        amount: r.get("amount"),
        currency: r.get("currency"),
        status: r.get("status"),
        email: r.get("email"),
        created_at: r.get("created_at"),
    }
}

#[async_trait::async_trait]
impl PaymentStore for PaymentsRepo {
    async fn insert(&self, payment: NewPayment) -> PaymentResult<PaymentRecord> {
        validate_amount(payment.amount).map_err(PaymentError::Validation)?;

        let result = sqlx::query(
            r#"
            INSERT INTO payments (txn_id, amount, currency, status, email)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, txn_id, amount, currency, status, email, created_at
            "#,
        )
        .bind(&payment.txn_id)
        .bind(payment.amount)
        .bind(&payment.currency)
        .bind(&payment.status)
        .bind(&payment.email)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(map_row(row)),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(PaymentError::Conflict(payment.txn_id))
            }
            Err(e) => Err(PaymentError::Storage(e.into())),
        }
    }

    async fn update_status_by_txn_id(&self, txn_id: &str, status: &str) -> PaymentResult<u64> {
        let done = sqlx::query("UPDATE payments SET status=$1 WHERE txn_id=$2")
            .bind(status)
            .bind(txn_id)
            .execute(&self.pool)
            .await
            .map_err(|e| PaymentError::Storage(e.into()))?;

        Ok(done.rows_affected())
    }

    async fn find_by_txn_id(&self, txn_id: &str) -> PaymentResult<Option<PaymentRecord>> {
        let row = sqlx::query(
            "SELECT id, txn_id, amount, currency, status, email, created_at FROM payments WHERE txn_id=$1",
        )
        .bind(txn_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PaymentError::Storage(e.into()))?;

        Ok(row.map(map_row))
    }

    async fn ping(&self) -> PaymentResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| PaymentError::Storage(e.into()))?;
        Ok(())
    }
}
