use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    Json,
};
use std::sync::Arc;

use crate::{
    domain::checkout::{CheckoutApi, CheckoutError, CheckoutRequest, CheckoutResponse},
    error::AppResult,
};

pub struct CheckoutController {
    checkout_service: Arc<dyn CheckoutApi>,
}

impl CheckoutController {
    pub fn new(checkout_service: Arc<dyn CheckoutApi>) -> Self {
        Self { checkout_service }
    }

    /// POST /api/checkout - Store a billing/shipping submission
    pub async fn submit(
        State(controller): State<Arc<CheckoutController>>,
        body: Result<Bytes, BytesRejection>,
    ) -> AppResult<Json<CheckoutResponse>> {
        let body = body.map_err(|rejection| CheckoutError::Malformed(rejection.body_text()))?;
        let request =
            CheckoutRequest::from_json(&body).map_err(|e| CheckoutError::Malformed(e.to_string()))?;

        let receipt = controller.checkout_service.submit(request).await?;

        Ok(Json(CheckoutResponse::from(receipt)))
    }
}
