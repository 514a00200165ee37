use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// A/B branch deciding whether the retention offer is shown.
/// `B` sees the downsell step, `A` goes straight to confirmation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Variant {
    A,
    B,
}

#[derive(Debug, Error)]
#[error("invalid variant '{0}', expected 'A' or 'B'")]
pub struct ParseVariantError(String);

impl Variant {
    /// Even bytes map to `A`, odd bytes to `B`.
    pub fn from_byte(byte: u8) -> Self {
        if byte % 2 == 0 {
            Variant::A
        } else {
            Variant::B
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::A => "A",
            Variant::B => "B",
        }
    }

    pub fn shows_downsell(&self) -> bool {
        matches!(self, Variant::B)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Variant::A),
            "B" => Ok(Variant::B),
            other => Err(ParseVariantError(other.to_string())),
        }
    }
}

impl TryFrom<String> for Variant {
    type Error = ParseVariantError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A stored row of the `cancellations` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct CancellationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subscription_id: String,
    #[sqlx(try_from = "String")]
    pub downsell_variant: Variant,
    pub reason: String,
    pub accepted_downsell: bool,
    pub created_at: DateTime<Utc>,
}

/// Values for a cancellation insert. `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewCancellation {
    pub user_id: Uuid,
    pub subscription_id: String,
    pub variant: Variant,
    pub reason: String,
    pub accepted_downsell: bool,
}
