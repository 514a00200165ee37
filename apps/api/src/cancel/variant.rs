use rand::rngs::OsRng;
use rand::RngCore;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::cancellation::Variant;
use crate::store::CancellationStore;

/// Draws one byte from the OS RNG and maps it to a variant.
pub fn draw_variant() -> Variant {
    let mut byte = [0u8; 1];
    OsRng.fill_bytes(&mut byte);
    Variant::from_byte(byte[0])
}

/// Returns the user's stored variant, or a freshly drawn one.
///
/// A fresh draw is NOT persisted here; it only sticks once a write step stores a
/// cancellation row. Two lookups racing before any write may see different variants.
/// A failed lookup is treated as "nothing stored".
pub async fn get_or_assign_variant(store: &dyn CancellationStore, user_id: Uuid) -> Variant {
    match store.find_variant(user_id).await {
        Ok(Some(variant)) => {
            debug!("Reusing stored variant {variant} for user {user_id}");
            variant
        }
        Ok(None) => {
            let variant = draw_variant();
            debug!("Drew new variant {variant} for user {user_id}");
            variant
        }
        Err(e) => {
            warn!("Variant lookup failed for user {user_id}, drawing a new one: {e}");
            draw_variant()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cancellation::NewCancellation;
    use crate::store::InMemoryStore;

    #[test]
    fn test_draws_cover_both_variants() {
        let draws: Vec<Variant> = (0..256).map(|_| draw_variant()).collect();
        // 2^-255 chance of a false failure per variant.
        assert!(draws.contains(&Variant::A));
        assert!(draws.contains(&Variant::B));
    }

    #[tokio::test]
    async fn test_stored_variant_is_sticky() {
        let store = InMemoryStore::seeded();
        let user_id = Uuid::new_v4();
        store
            .insert_cancellation(NewCancellation {
                user_id,
                subscription_id: "sub-1".to_string(),
                variant: Variant::B,
                reason: "Other".to_string(),
                accepted_downsell: false,
            })
            .await
            .unwrap();

        for _ in 0..20 {
            assert_eq!(get_or_assign_variant(&store, user_id).await, Variant::B);
        }
    }

    #[tokio::test]
    async fn test_unknown_user_gets_a_valid_variant() {
        let store = InMemoryStore::seeded();
        let variant = get_or_assign_variant(&store, Uuid::new_v4()).await;
        assert!(matches!(variant, Variant::A | Variant::B));
    }
}
