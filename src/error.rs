use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Processor error: {0}")]
    Upstream(String),

    #[error("Payment already exists: {0}")]
    Conflict(String),

    #[error("Notification signature mismatch")]
    Authentication,

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

pub type PaymentResult<T> = Result<T, PaymentError>;
