use super::error::CheckoutError;
use super::model::{CheckoutRequest, OrderIntakeReceipt};
use crate::infrastructure::repositories::OrderIntakeRepository;
use async_trait::async_trait;
use std::sync::Arc;

pub struct CheckoutService {
    order_intake_repo: Arc<OrderIntakeRepository>,
}

impl CheckoutService {
    pub fn new(order_intake_repo: Arc<OrderIntakeRepository>) -> Self {
        Self { order_intake_repo }
    }
}

#[async_trait]
pub trait CheckoutApi: Send + Sync {
    /// Persist one checkout submission. Not idempotent: every call inserts a row.
    async fn submit(&self, request: CheckoutRequest) -> Result<OrderIntakeReceipt, CheckoutError>;
}

#[async_trait]
impl CheckoutApi for CheckoutService {
    async fn submit(&self, request: CheckoutRequest) -> Result<OrderIntakeReceipt, CheckoutError> {
        let receipt = self.order_intake_repo.insert(&request).await.map_err(|e| {
            tracing::error!(
                error = %e,
                has_email = request.email.is_some(),
                ship_different = request.ship_different,
                "Failed to persist checkout submission"
            );
            CheckoutError::Persistence(e)
        })?;

        tracing::info!(order_intake_id = %receipt.id, "Checkout submission stored");

        Ok(receipt)
    }
}
