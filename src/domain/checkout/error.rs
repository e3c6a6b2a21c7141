use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("invalid checkout payload: {0}")]
    Malformed(String),
    #[error(transparent)]
    Persistence(#[from] sqlx::Error),
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::Malformed(msg) => AppError::MalformedPayload(msg),
            CheckoutError::Persistence(e) => AppError::Database(e),
        }
    }
}
