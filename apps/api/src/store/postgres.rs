use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::models::cancellation::{CancellationRow, NewCancellation, Variant};
use crate::models::subscription::{SubscriptionRow, SubscriptionStatus};
use crate::store::{CancellationStore, StoreError};

#[derive(Clone)]
pub struct PgCancellationStore {
    pool: PgPool,
}

impl PgCancellationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CancellationStore for PgCancellationStore {
    async fn find_variant(&self, user_id: Uuid) -> Result<Option<Variant>, StoreError> {
        let stored: Option<String> = sqlx::query_scalar(
            r#"
            SELECT downsell_variant
            FROM cancellations
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        stored
            .map(|v| {
                v.parse::<Variant>()
                    .map_err(|e| StoreError::InvalidRow(e.to_string()))
            })
            .transpose()
    }

    async fn mark_pending_cancellation(&self, subscription_id: &str) -> Result<u64, StoreError> {
        let result =
            sqlx::query("UPDATE subscriptions SET status = $1, updated_at = NOW() WHERE id = $2")
                .bind(SubscriptionStatus::PendingCancellation.as_str())
                .bind(subscription_id)
                .execute(&self.pool)
                .await?;

        debug!(
            "Marked subscription {subscription_id} pending_cancellation ({} rows)",
            result.rows_affected()
        );
        Ok(result.rows_affected())
    }

    async fn insert_cancellation(
        &self,
        cancellation: NewCancellation,
    ) -> Result<CancellationRow, StoreError> {
        let row = sqlx::query_as::<_, CancellationRow>(
            r#"
            INSERT INTO cancellations
                (id, user_id, subscription_id, downsell_variant, reason, accepted_downsell)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(cancellation.user_id)
        .bind(&cancellation.subscription_id)
        .bind(cancellation.variant.as_str())
        .bind(&cancellation.reason)
        .bind(cancellation.accepted_downsell)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Option<SubscriptionRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, SubscriptionRow>("SELECT * FROM subscriptions WHERE id = $1")
                .bind(subscription_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_cancellations(&self, user_id: Uuid) -> Result<Vec<CancellationRow>, StoreError> {
        Ok(sqlx::query_as::<_, CancellationRow>(
            "SELECT * FROM cancellations WHERE user_id = $1 ORDER BY created_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        let _: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
