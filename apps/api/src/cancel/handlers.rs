use axum::{body::Bytes, extract::State, Json};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::cancel::payload::{
    CancelAction, CancellationResponse, VariantResponse, KNOWN_ACTIONS,
};
use crate::cancel::{service, variant};
use crate::errors::AppError;
use crate::models::cancellation::Variant;
use crate::state::AppState;
use crate::store::CancellationStore;

#[derive(Serialize)]
#[serde(untagged)]
pub enum ActionResponse {
    Variant(VariantResponse),
    Cancellation(CancellationResponse),
}

/// POST /api/cancel
pub async fn handle_cancel_action(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ActionResponse>, AppError> {
    let store = state.store.as_ref();
    let value = parse_body(&body)?;

    // A userId the store could never match is a lookup miss, not a failure.
    if action_name(&value)? == "get_variant" {
        return Ok(Json(ActionResponse::Variant(VariantResponse {
            variant: variant_for(store, &value).await,
        })));
    }

    let action: CancelAction =
        serde_json::from_value(value).map_err(|e| AppError::Malformed(e.to_string()))?;

    let response = match action {
        CancelAction::GetVariant(req) => ActionResponse::Variant(VariantResponse {
            variant: variant::get_or_assign_variant(store, req.user_id).await,
        }),
        CancelAction::CancelSubscription(req) => {
            let cancellation = service::cancel_subscription(store, req).await?;
            ActionResponse::Cancellation(CancellationResponse {
                success: true,
                message: None,
                cancellation,
            })
        }
        CancelAction::AcceptDownsell(req) => {
            let cancellation = service::accept_downsell(store, req).await?;
            ActionResponse::Cancellation(CancellationResponse {
                success: true,
                message: Some("Downsell accepted".to_string()),
                cancellation,
            })
        }
    };

    Ok(Json(response))
}

fn parse_body(body: &[u8]) -> Result<Value, AppError> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::Malformed(format!("invalid JSON body: {e}")))
}

/// Unknown or missing `action` is rejected before the fields are looked at.
fn action_name(value: &Value) -> Result<&str, AppError> {
    value
        .get("action")
        .and_then(Value::as_str)
        .filter(|a| KNOWN_ACTIONS.contains(a))
        .ok_or(AppError::InvalidAction)
}

async fn variant_for(store: &dyn CancellationStore, value: &Value) -> Variant {
    let user_id = value
        .get("userId")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<Uuid>().ok());

    match user_id {
        Some(user_id) => variant::get_or_assign_variant(store, user_id).await,
        None => {
            warn!(
                "get_variant without a usable userId ({:?}), drawing a new variant",
                value.get("userId")
            );
            variant::draw_variant()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_action_is_rejected() {
        let value = json!({ "action": "delete_everything" });
        assert!(matches!(action_name(&value), Err(AppError::InvalidAction)));
    }

    #[test]
    fn test_missing_action_is_rejected() {
        let value = json!({ "userId": "x" });
        assert!(matches!(action_name(&value), Err(AppError::InvalidAction)));
    }

    #[test]
    fn test_known_action_is_returned() {
        let value = json!({ "action": "accept_downsell" });
        assert_eq!(action_name(&value).unwrap(), "accept_downsell");
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = parse_body(b"{not json").unwrap_err();
        assert!(matches!(err, AppError::Malformed(_)));
    }
}
