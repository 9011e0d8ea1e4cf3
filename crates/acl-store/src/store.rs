//! Grant store traits
//!
//! The resolution core depends only on these traits. A [`GrantStore`]
//! produces [`GrantSnapshot`]s; every read made while answering one query
//! goes to the same snapshot, so a concurrent write is either fully
//! visible to that query or not visible at all.

use acl_model::{Grant, GroupId, Resource, ResourceId, Subject, User, UserId};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::StoreResult;

/// Point-in-time, read-only view of users, groups, memberships, resources
/// and grants.
///
/// Implementations backed by a database map a snapshot to one read
/// transaction.
#[async_trait]
pub trait GrantSnapshot: Send + Sync {
    /// Store revision this snapshot was taken at.
    ///
    /// Revisions increase monotonically: any write to users, groups,
    /// memberships, resources or grants yields a larger one.
    fn revision(&self) -> u64;

    /// Look up a user.
    async fn get_user(&self, id: UserId) -> StoreResult<Option<User>>;

    /// Look up a resource.
    async fn get_resource(&self, id: ResourceId) -> StoreResult<Option<Resource>>;

    /// All users, ascending by id.
    async fn list_users(&self) -> StoreResult<Vec<User>>;

    /// All resources, ascending by id.
    async fn list_resources(&self) -> StoreResult<Vec<Resource>>;

    /// Groups the user belongs to.
    async fn list_group_ids_of_user(&self, user_id: UserId) -> StoreResult<BTreeSet<GroupId>>;

    /// Members of a group.
    async fn list_members_of_group(&self, group_id: GroupId) -> StoreResult<BTreeSet<UserId>>;

    /// Grants on one resource.
    async fn list_grants_for_resource(&self, resource_id: ResourceId) -> StoreResult<Vec<Grant>>;

    /// Grants whose subject is any of `subjects`.
    async fn list_grants_for_subjects(&self, subjects: &[Subject]) -> StoreResult<Vec<Grant>>;

    /// Whether the resource is shared with everyone.
    async fn has_global_grant(&self, resource_id: ResourceId) -> StoreResult<bool>;

    /// Every grant in the store.
    async fn list_all_grants(&self) -> StoreResult<Vec<Grant>>;

    /// Number of users.
    async fn total_user_count(&self) -> StoreResult<u64>;
}

/// Source of consistent snapshots.
#[async_trait]
pub trait GrantStore: Send + Sync {
    /// Snapshot type handed out by this store.
    type Snapshot: GrantSnapshot;

    /// Take a snapshot of the current state.
    async fn snapshot(&self) -> StoreResult<Self::Snapshot>;
}

#[async_trait]
impl<S: GrantStore + ?Sized> GrantStore for Arc<S> {
    type Snapshot = S::Snapshot;

    async fn snapshot(&self) -> StoreResult<Self::Snapshot> {
        (**self).snapshot().await
    }
}
