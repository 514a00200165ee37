//! Persistence for subscriptions and cancellation records.
//!
//! `AppState` holds an `Arc<dyn CancellationStore>`: Postgres when
//! `DATABASE_URL` is configured, the in-memory store otherwise.
//! Writes are single statements with no transactional grouping.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::cancellation::{CancellationRow, NewCancellation, Variant};
use crate::models::subscription::SubscriptionRow;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgCancellationStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid stored row: {0}")]
    InvalidRow(String),
}

#[async_trait]
pub trait CancellationStore: Send + Sync {
    /// Variant of the user's most recent cancellation record, if any.
    async fn find_variant(&self, user_id: Uuid) -> Result<Option<Variant>, StoreError>;

    /// Sets the subscription to `pending_cancellation` and bumps `updated_at`.
    /// Returns the number of rows touched; an unknown id touches none.
    async fn mark_pending_cancellation(&self, subscription_id: &str) -> Result<u64, StoreError>;

    async fn insert_cancellation(
        &self,
        cancellation: NewCancellation,
    ) -> Result<CancellationRow, StoreError>;

    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Option<SubscriptionRow>, StoreError>;

    /// All cancellation rows for a user, oldest first.
    async fn list_cancellations(&self, user_id: Uuid) -> Result<Vec<CancellationRow>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
