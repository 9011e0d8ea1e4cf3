//! # Identities
//!
//! Typed identifiers for users, groups and resources. Each wraps a
//! non-negative integer and serializes as a bare number.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Get the raw integer value.
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Identifier of a user.
    ///
    /// Id `0` is reserved for the "everyone" subject at the raw grant
    /// boundary and is never assigned to a real user.
    UserId
);

id_type!(
    /// Identifier of a group.
    GroupId
);

id_type!(
    /// Identifier of a shareable resource.
    ResourceId
);
