use serde::Serialize;
use uuid::Uuid;

use crate::models::subscription::SubscriptionStatus;

/// The hardcoded user the flow runs as. There is no authentication layer.
pub const MOCK_USER: MockUser = MockUser {
    id: Uuid::from_u128(0x550e8400_e29b_41d4_a716_446655440001),
    email: "user1@example.com",
    name: "Mihailo",
    subscription: MockSubscription {
        id: "sub-1",
        monthly_price: 2500,
        status: SubscriptionStatus::Active,
    },
};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MockUser {
    pub id: Uuid,
    pub email: &'static str,
    pub name: &'static str,
    pub subscription: MockSubscription,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MockSubscription {
    pub id: &'static str,
    /// Price in cents.
    pub monthly_price: i64,
    pub status: SubscriptionStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_user_id_matches_seeded_uuid() {
        assert_eq!(
            MOCK_USER.id.to_string(),
            "550e8400-e29b-41d4-a716-446655440001"
        );
        assert_eq!(MOCK_USER.subscription.monthly_price, 2500);
    }
}
