//! Entity domain models
//!
//! Users, groups, resources and the membership link between users and
//! groups. These are the records a grant store holds; the resolution core
//! only ever reads them.

use serde::{Deserialize, Serialize};

use crate::ids::{GroupId, ResourceId, UserId};

/// A user that can be granted access to resources.
///
/// Serializes as `{"id": <int>, "name": <string>}`, which is also the row
/// shape of a resource access list.
///
/// # Examples
///
/// ```
/// use acl_model::{User, UserId};
///
/// let user = User::new(UserId(1), "User1");
/// assert_eq!(user.name, "User1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID
    pub id: UserId,

    /// Unique user name
    pub name: String,
}

impl User {
    /// Creates a new user.
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A named set of users. Sharing a resource with a group shares it with
/// every current member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Unique group ID
    pub id: GroupId,

    /// Unique group name
    pub name: String,
}

impl Group {
    /// Creates a new group.
    pub fn new(id: GroupId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A shareable resource.
///
/// Serializes as `{"id": <int>, "name": <string>}`, the row shape of a user
/// resource list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Unique resource ID
    pub id: ResourceId,

    /// Unique resource name
    pub name: String,
}

impl Resource {
    /// Creates a new resource.
    pub fn new(id: ResourceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Membership linking a user to a group.
///
/// A user may belong to zero or more groups; the pair is unique.
///
/// # Examples
///
/// ```
/// use acl_model::{GroupId, Membership, UserId};
///
/// let membership = Membership::new(UserId(3), GroupId(2));
/// assert_eq!(membership.group_id, GroupId(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Membership {
    /// Member user ID
    pub user_id: UserId,

    /// Group ID
    pub group_id: GroupId,
}

impl Membership {
    /// Creates a new membership.
    pub fn new(user_id: UserId, group_id: GroupId) -> Self {
        Self { user_id, group_id }
    }
}
