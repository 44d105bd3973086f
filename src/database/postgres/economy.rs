use sqlx::PgPool;

use crate::gateways::{GatewayError, RewardLedger};

pub struct PostgresRewardLedger {
    pool: PgPool,
}

impl PostgresRewardLedger {
    pub fn new(pool: PgPool) -> Self {
        PostgresRewardLedger { pool }
    }
}

#[async_trait::async_trait]
impl RewardLedger for PostgresRewardLedger {
    async fn credit(&self, user_id: i64, amount: i64) -> Result<(), GatewayError> {
        sqlx::query(
            "INSERT INTO balances (user_id, balance) VALUES ($1, $2)
             ON CONFLICT (user_id) DO UPDATE SET balance = balances.balance + EXCLUDED.balance",
        )
        .bind(user_id)
        .bind(amount)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
