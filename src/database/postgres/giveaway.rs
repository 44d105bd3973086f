use sqlx::PgPool;

use crate::{
    gateways::{GatewayError, GiveawayStore},
    models::giveaway::{DatabaseGiveaway, Giveaway},
};

pub struct PostgresGiveawayStore {
    pool: PgPool,
}

impl PostgresGiveawayStore {
    pub fn new(pool: PgPool) -> Self {
        PostgresGiveawayStore { pool }
    }
}

#[async_trait::async_trait]
impl GiveawayStore for PostgresGiveawayStore {
    async fn find_active(&self) -> Result<Option<Giveaway>, GatewayError> {
        let Some(row) = sqlx::query_as::<_, DatabaseGiveaway>(
            "SELECT id, channel_id, prize, winners, host_id, image, ends_at FROM giveaways LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let participants =
            sqlx::query_scalar::<_, i64>("SELECT user_id FROM giveaway_entry WHERE giveaway_id = $1")
                .bind(row.id)
                .fetch_all(&self.pool)
                .await?;

        Ok(Some(row.into_giveaway(participants)))
    }

    async fn insert(&self, giveaway: &Giveaway) -> Result<(), GatewayError> {
        let row = DatabaseGiveaway::from(giveaway);
        sqlx::query(
            "INSERT INTO giveaways (id, channel_id, prize, winners, host_id, image, ends_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(row.id)
        .bind(row.channel_id)
        .bind(row.prize)
        .bind(row.winners)
        .bind(row.host_id)
        .bind(row.image)
        .bind(row.ends_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn append_participant(&self, giveaway_id: i64, user_id: i64) -> Result<(), GatewayError> {
        sqlx::query("INSERT INTO giveaway_entry (giveaway_id, user_id) VALUES ($1, $2)")
            .bind(giveaway_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, giveaway_id: i64) -> Result<(), GatewayError> {
        // Entries go with the giveaway through the cascading foreign key.
        sqlx::query("DELETE FROM giveaways WHERE id = $1")
            .bind(giveaway_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
