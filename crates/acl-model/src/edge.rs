//! Access edges
//!
//! An access edge is the derived fact "this user can access this
//! resource". Edges are computed by resolution and never stored.

use serde::{Deserialize, Serialize};

use crate::ids::{ResourceId, UserId};

/// A derived `(resource, user)` access pair.
///
/// Ordering is by resource first, then user, so a sorted edge set groups
/// naturally by resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccessEdge {
    /// The accessible resource
    pub resource_id: ResourceId,
    /// The user holding access
    pub user_id: UserId,
}

impl AccessEdge {
    /// Create a new edge.
    pub fn new(resource_id: ResourceId, user_id: UserId) -> Self {
        Self {
            resource_id,
            user_id,
        }
    }
}
