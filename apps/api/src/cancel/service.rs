use tracing::{info, warn};

use crate::cancel::payload::{AcceptDownsellRequest, CancelSubscriptionRequest};
use crate::models::cancellation::{CancellationRow, NewCancellation};
use crate::store::{CancellationStore, StoreError};

/// Final confirmation: marks the subscription `pending_cancellation`, then records
/// the cancellation.
///
/// The two writes are not grouped. If the status update lands and the insert fails,
/// the subscription stays `pending_cancellation` with no matching row.
pub async fn cancel_subscription(
    store: &dyn CancellationStore,
    req: CancelSubscriptionRequest,
) -> Result<CancellationRow, StoreError> {
    let touched = store.mark_pending_cancellation(&req.subscription_id).await?;
    if touched == 0 {
        warn!(
            "Subscription {} not found while cancelling for user {}",
            req.subscription_id, req.user_id
        );
    }

    let row = store
        .insert_cancellation(NewCancellation {
            user_id: req.user_id,
            subscription_id: req.subscription_id,
            variant: req.variant,
            reason: req.reason,
            accepted_downsell: req.accepted_downsell,
        })
        .await?;

    info!(
        "Cancellation {} recorded for user {} (variant {}, accepted_downsell={})",
        row.id, row.user_id, row.downsell_variant, row.accepted_downsell
    );
    Ok(row)
}

/// Records an accepted retention offer. The subscription status is left as is.
pub async fn accept_downsell(
    store: &dyn CancellationStore,
    req: AcceptDownsellRequest,
) -> Result<CancellationRow, StoreError> {
    let row = store
        .insert_cancellation(NewCancellation {
            user_id: req.user_id,
            subscription_id: req.subscription_id,
            variant: req.variant,
            reason: req.reason,
            accepted_downsell: true,
        })
        .await?;

    // Payment processing is out of scope; the price change is only logged.
    info!(
        "Downsell accepted by user {} on subscription {}; payment update skipped",
        row.user_id, row.subscription_id
    );
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cancellation::Variant;
    use crate::models::subscription::SubscriptionStatus;
    use crate::models::user::MOCK_USER;
    use crate::store::InMemoryStore;
    use async_trait::async_trait;
    use uuid::Uuid;

    use crate::models::subscription::SubscriptionRow;

    fn cancel_request(variant: Variant, accepted_downsell: bool) -> CancelSubscriptionRequest {
        CancelSubscriptionRequest {
            user_id: MOCK_USER.id,
            subscription_id: MOCK_USER.subscription.id.to_string(),
            variant,
            reason: "Not using it enough".to_string(),
            accepted_downsell,
        }
    }

    /// Store whose status update succeeds but whose inserts always fail.
    struct InsertFailingStore {
        inner: InMemoryStore,
    }

    #[async_trait]
    impl CancellationStore for InsertFailingStore {
        async fn find_variant(&self, user_id: Uuid) -> Result<Option<Variant>, StoreError> {
            self.inner.find_variant(user_id).await
        }

        async fn mark_pending_cancellation(&self, id: &str) -> Result<u64, StoreError> {
            self.inner.mark_pending_cancellation(id).await
        }

        async fn insert_cancellation(
            &self,
            _cancellation: NewCancellation,
        ) -> Result<CancellationRow, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn get_subscription(&self, id: &str) -> Result<Option<SubscriptionRow>, StoreError> {
            self.inner.get_subscription(id).await
        }

        async fn list_cancellations(
            &self,
            user_id: Uuid,
        ) -> Result<Vec<CancellationRow>, StoreError> {
            self.inner.list_cancellations(user_id).await
        }

        async fn health_check(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_cancel_marks_pending_and_inserts_one_row() {
        let store = InMemoryStore::seeded();
        let row = cancel_subscription(&store, cancel_request(Variant::A, false))
            .await
            .unwrap();

        assert_eq!(row.reason, "Not using it enough");
        assert_eq!(row.downsell_variant, Variant::A);
        assert!(!row.accepted_downsell);

        let sub = store.get_subscription("sub-1").await.unwrap().unwrap();
        assert_eq!(sub.status, SubscriptionStatus::PendingCancellation);

        let rows = store.list_cancellations(MOCK_USER.id).await.unwrap();
        assert_eq!(rows, vec![row]);
    }

    #[tokio::test]
    async fn test_accept_downsell_always_records_acceptance_and_keeps_status() {
        let store = InMemoryStore::seeded();
        let row = accept_downsell(
            &store,
            AcceptDownsellRequest {
                user_id: MOCK_USER.id,
                subscription_id: "sub-1".to_string(),
                variant: Variant::B,
                reason: "Too expensive".to_string(),
            },
        )
        .await
        .unwrap();

        assert!(row.accepted_downsell);
        let sub = store.get_subscription("sub-1").await.unwrap().unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Active);
    }

    #[tokio::test]
    async fn test_cancel_unknown_subscription_still_records_row() {
        let store = InMemoryStore::seeded();
        let mut req = cancel_request(Variant::B, false);
        req.subscription_id = "sub-missing".to_string();

        let row = cancel_subscription(&store, req).await.unwrap();
        assert_eq!(row.subscription_id, "sub-missing");
        let sub = store.get_subscription("sub-1").await.unwrap().unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Active);
    }

    #[tokio::test]
    async fn test_failed_insert_leaves_status_updated() {
        let store = InsertFailingStore {
            inner: InMemoryStore::seeded(),
        };
        let err = cancel_subscription(&store, cancel_request(Variant::A, false))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));

        let sub = store.get_subscription("sub-1").await.unwrap().unwrap();
        assert_eq!(sub.status, SubscriptionStatus::PendingCancellation);
        assert!(store
            .list_cancellations(MOCK_USER.id)
            .await
            .unwrap()
            .is_empty());
    }
}
