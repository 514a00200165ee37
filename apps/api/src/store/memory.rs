use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::cancellation::{CancellationRow, NewCancellation, Variant};
use crate::models::subscription::{SubscriptionRow, SubscriptionStatus};
use crate::models::user::MOCK_USER;
use crate::store::{CancellationStore, StoreError};

#[derive(Default)]
struct Tables {
    subscriptions: HashMap<String, SubscriptionRow>,
    cancellations: Vec<CancellationRow>,
}

/// Process-local store used when no database is configured, and in tests.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    /// A store holding the mock user's active subscription, like the seed migration.
    pub fn seeded() -> Self {
        let mut store = Self::default();
        let sub = MOCK_USER.subscription;
        store.tables.get_mut().subscriptions.insert(
            sub.id.to_string(),
            SubscriptionRow {
                id: sub.id.to_string(),
                monthly_price: sub.monthly_price,
                status: sub.status,
                updated_at: Utc::now(),
            },
        );
        store
    }
}

#[async_trait]
impl CancellationStore for InMemoryStore {
    async fn find_variant(&self, user_id: Uuid) -> Result<Option<Variant>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .cancellations
            .iter()
            .rev()
            .find(|c| c.user_id == user_id)
            .map(|c| c.downsell_variant))
    }

    async fn mark_pending_cancellation(&self, subscription_id: &str) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock().await;
        match tables.subscriptions.get_mut(subscription_id) {
            Some(sub) => {
                sub.status = SubscriptionStatus::PendingCancellation;
                sub.updated_at = Utc::now();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn insert_cancellation(
        &self,
        cancellation: NewCancellation,
    ) -> Result<CancellationRow, StoreError> {
        let row = CancellationRow {
            id: Uuid::new_v4(),
            user_id: cancellation.user_id,
            subscription_id: cancellation.subscription_id,
            downsell_variant: cancellation.variant,
            reason: cancellation.reason,
            accepted_downsell: cancellation.accepted_downsell,
            created_at: Utc::now(),
        };
        self.tables.lock().await.cancellations.push(row.clone());
        Ok(row)
    }

    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Option<SubscriptionRow>, StoreError> {
        Ok(self
            .tables
            .lock()
            .await
            .subscriptions
            .get(subscription_id)
            .cloned())
    }

    async fn list_cancellations(&self, user_id: Uuid) -> Result<Vec<CancellationRow>, StoreError> {
        Ok(self
            .tables
            .lock()
            .await
            .cancellations
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
