pub mod checkout;
pub mod health;
pub mod token_exchange;

use crate::error::AppError;

/// Fallback for any method other than POST on the API routes.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
