//! Result rows for the aggregate queries.
//!
//! Rows serialize with the field names callers rely on: `id`, `name`,
//! `userCount` and `resourceCount`.

use serde::{Deserialize, Serialize};

use crate::entities::{Resource, User};
use crate::ids::{ResourceId, UserId};

/// A resource with the number of distinct users who can access it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceUserCount {
    /// Resource ID
    pub id: ResourceId,
    /// Resource name
    pub name: String,
    /// Distinct users with access
    pub user_count: u64,
}

impl ResourceUserCount {
    /// Build a row from a resource and its count.
    pub fn new(resource: &Resource, user_count: u64) -> Self {
        Self {
            id: resource.id,
            name: resource.name.clone(),
            user_count,
        }
    }
}

/// A user with the number of distinct resources they can access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResourceCount {
    /// User ID
    pub id: UserId,
    /// User name
    pub name: String,
    /// Distinct accessible resources
    pub resource_count: u64,
}

impl UserResourceCount {
    /// Build a row from a user and its count.
    pub fn new(user: &User, resource_count: u64) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            resource_count,
        }
    }
}
