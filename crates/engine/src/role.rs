use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Role of a user, fixed at registration.
///
/// A `Buyer` owns a deposit and can buy products; a `Seller` owns products.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    Buyer,
    Seller,
}

impl Role {
    /// Canonical role string stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Buyer => "BUYER",
            Role::Seller => "SELLER",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Role {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "BUYER" => Ok(Role::Buyer),
            "SELLER" => Ok(Role::Seller),
            other => Err(EngineError::InvalidInput(format!("invalid role: {other}"))),
        }
    }
}
