use crate::domain::checkout::{CheckoutRequest, OrderIntakeReceipt};
use crate::infrastructure::db::DbPool;
use std::sync::Arc;

pub struct OrderIntakeRepository {
    pool: Arc<DbPool>,
}

impl OrderIntakeRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Insert a submission; the store assigns `id` and `created_at`.
    pub async fn insert(&self, request: &CheckoutRequest) -> Result<OrderIntakeReceipt, sqlx::Error> {
        let pool = self.pool.as_ref();
        sqlx::query_as::<_, OrderIntakeReceipt>(
            r#"
            INSERT INTO order_intakes (
                first_name, last_name, company, country, address, number, complement,
                city, state, zip, phone, email, notes, ship_different
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id, created_at
            "#,
        )
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.company)
        .bind(&request.country)
        .bind(&request.address)
        .bind(&request.number)
        .bind(&request.complement)
        .bind(&request.city)
        .bind(&request.state)
        .bind(&request.zip)
        .bind(&request.phone)
        .bind(&request.email)
        .bind(&request.notes)
        .bind(request.ship_different)
        .fetch_one(pool)
        .await
    }
}
