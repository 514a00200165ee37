//! Wire types for `POST /api/cancel`, shared by the handler and the wizard's HTTP client.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::cancellation::{CancellationRow, Variant};

pub const KNOWN_ACTIONS: [&str; 3] = ["get_variant", "cancel_subscription", "accept_downsell"];

/// Request body, discriminated by its `action` field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CancelAction {
    GetVariant(GetVariantRequest),
    CancelSubscription(CancelSubscriptionRequest),
    AcceptDownsell(AcceptDownsellRequest),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GetVariantRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CancelSubscriptionRequest {
    pub user_id: Uuid,
    pub subscription_id: String,
    pub variant: Variant,
    pub reason: String,
    #[serde(default)]
    pub accepted_downsell: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AcceptDownsellRequest {
    pub user_id: Uuid,
    pub subscription_id: String,
    pub variant: Variant,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantResponse {
    pub variant: Variant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancellationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub cancellation: CancellationRow,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
