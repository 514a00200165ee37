use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    PendingCancellation,
    Cancelled,
}

#[derive(Debug, Error)]
#[error("unknown subscription status '{0}'")]
pub struct ParseStatusError(String);

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PendingCancellation => "pending_cancellation",
            SubscriptionStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SubscriptionStatus::Active),
            "pending_cancellation" => Ok(SubscriptionStatus::PendingCancellation),
            "cancelled" => Ok(SubscriptionStatus::Cancelled),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

impl TryFrom<String> for SubscriptionStatus {
    type Error = ParseStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubscriptionRow {
    pub id: String,
    pub monthly_price: i64,
    #[sqlx(try_from = "String")]
    pub status: SubscriptionStatus,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parses_stored_values() {
        assert_eq!(
            "pending_cancellation".parse::<SubscriptionStatus>().unwrap(),
            SubscriptionStatus::PendingCancellation
        );
        assert_eq!(SubscriptionStatus::Active.to_string(), "active");
    }

    #[test]
    fn test_status_rejects_unknown_value() {
        assert!("paused".parse::<SubscriptionStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&SubscriptionStatus::PendingCancellation).unwrap();
        assert_eq!(json, "\"pending_cancellation\"");
    }
}
