//! Strongly-typed ID wrappers for ledger records
//!
//! Using newtype wrappers prevents accidentally deleting a debt with the id
//! of a cash-flow entry. Ids are assigned by the persistence gateway.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Parse an ID from a string
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                s.parse()
            }

            /// Check whether a user-typed identifier refers to this ID
            ///
            /// Accepts the full UUID, the short display form (`cf-1a2b3c4d`)
            /// or any UUID prefix of at least four characters.
            pub fn matches(&self, identifier: &str) -> bool {
                let identifier = identifier.trim();
                let bare = identifier.strip_prefix($display_prefix).unwrap_or(identifier);
                bare.len() >= 4 && self.0.to_string().starts_with(&bare.to_lowercase())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, &self.0.to_string()[..8])
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(CashFlowEntryId, "cf-");
define_id!(OperationalCostId, "cost-");
define_id!(DebtId, "debt-");
