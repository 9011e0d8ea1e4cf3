//! In-memory grant store
//!
//! [`MemoryGrantStore`] keeps the whole state behind one `Arc`. Taking a
//! snapshot clones the `Arc`; writers copy-on-write through
//! [`Arc::make_mut`], so outstanding snapshots never observe a write.
//!
//! This is suitable for single-process services and testing. A database
//! backed store implements the same traits over read transactions.

use acl_model::{
    Grant, Group, GroupId, Membership, Resource, ResourceId, Subject, User, UserId,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::dataset::Dataset;
use crate::error::{StoreError, StoreResult};
use crate::sample::sample_dataset;
use crate::store::{GrantSnapshot, GrantStore};

/// Store statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of users
    pub users: usize,
    /// Number of groups
    pub groups: usize,
    /// Number of memberships
    pub memberships: usize,
    /// Number of resources
    pub resources: usize,
    /// Number of grants
    pub grants: usize,
    /// Number of grants shared with everyone
    pub global_grants: usize,
    /// Current revision
    pub revision: u64,
}

/// Indexed store contents. Cloned on write only while snapshots hold it.
#[derive(Debug, Clone, Default)]
struct StoreState {
    users: BTreeMap<UserId, User>,
    groups: BTreeMap<GroupId, Group>,
    resources: BTreeMap<ResourceId, Resource>,
    groups_of_user: BTreeMap<UserId, BTreeSet<GroupId>>,
    members_of_group: BTreeMap<GroupId, BTreeSet<UserId>>,
    grants_by_resource: BTreeMap<ResourceId, BTreeSet<Subject>>,
    grants_by_subject: BTreeMap<Subject, BTreeSet<ResourceId>>,
    revision: u64,
}

impl StoreState {
    fn grant_count(&self) -> usize {
        self.grants_by_resource.values().map(BTreeSet::len).sum()
    }

    fn membership_count(&self) -> usize {
        self.groups_of_user.values().map(BTreeSet::len).sum()
    }

    fn check_user(&self, user: &User) -> StoreResult<()> {
        if user.id.get() == Subject::EVERYONE_ID {
            return Err(StoreError::InvariantViolation(
                "user id 0 is reserved for everyone".to_string(),
            ));
        }
        if self.users.contains_key(&user.id) {
            return Err(StoreError::InvariantViolation(format!(
                "duplicate user id: {}",
                user.id
            )));
        }
        if self.users.values().any(|u| u.name == user.name) {
            return Err(StoreError::InvariantViolation(format!(
                "duplicate user name: {}",
                user.name
            )));
        }
        Ok(())
    }

    fn check_group(&self, group: &Group) -> StoreResult<()> {
        if group.id.get() == Subject::EVERYONE_ID {
            return Err(StoreError::InvariantViolation(
                "group id 0 is reserved".to_string(),
            ));
        }
        if self.groups.contains_key(&group.id) {
            return Err(StoreError::InvariantViolation(format!(
                "duplicate group id: {}",
                group.id
            )));
        }
        if self.groups.values().any(|g| g.name == group.name) {
            return Err(StoreError::InvariantViolation(format!(
                "duplicate group name: {}",
                group.name
            )));
        }
        Ok(())
    }

    fn check_resource(&self, resource: &Resource) -> StoreResult<()> {
        if self.resources.contains_key(&resource.id) {
            return Err(StoreError::InvariantViolation(format!(
                "duplicate resource id: {}",
                resource.id
            )));
        }
        if self.resources.values().any(|r| r.name == resource.name) {
            return Err(StoreError::InvariantViolation(format!(
                "duplicate resource name: {}",
                resource.name
            )));
        }
        Ok(())
    }

    fn check_membership(&self, membership: &Membership) -> StoreResult<()> {
        if !self.users.contains_key(&membership.user_id) {
            return Err(StoreError::InvariantViolation(format!(
                "membership references unknown user: {}",
                membership.user_id
            )));
        }
        if !self.groups.contains_key(&membership.group_id) {
            return Err(StoreError::InvariantViolation(format!(
                "membership references unknown group: {}",
                membership.group_id
            )));
        }
        let exists = self
            .groups_of_user
            .get(&membership.user_id)
            .is_some_and(|groups| groups.contains(&membership.group_id));
        if exists {
            return Err(StoreError::InvariantViolation(format!(
                "duplicate membership: user {} in group {}",
                membership.user_id, membership.group_id
            )));
        }
        Ok(())
    }

    fn check_grant(&self, grant: &Grant) -> StoreResult<()> {
        if !self.resources.contains_key(&grant.resource_id) {
            return Err(StoreError::InvariantViolation(format!(
                "grant references unknown resource: {}",
                grant.resource_id
            )));
        }
        let exists = self
            .grants_by_resource
            .get(&grant.resource_id)
            .is_some_and(|subjects| subjects.contains(&grant.subject));
        if exists {
            return Err(StoreError::InvariantViolation(format!(
                "duplicate grant: {}",
                grant
            )));
        }
        Ok(())
    }

    fn insert_membership(&mut self, membership: Membership) {
        self.groups_of_user
            .entry(membership.user_id)
            .or_default()
            .insert(membership.group_id);
        self.members_of_group
            .entry(membership.group_id)
            .or_default()
            .insert(membership.user_id);
    }

    fn insert_grant(&mut self, grant: Grant) {
        self.grants_by_resource
            .entry(grant.resource_id)
            .or_default()
            .insert(grant.subject);
        self.grants_by_subject
            .entry(grant.subject)
            .or_default()
            .insert(grant.resource_id);
    }

    fn remove_membership(&mut self, membership: Membership) -> bool {
        let removed = self
            .groups_of_user
            .get_mut(&membership.user_id)
            .is_some_and(|groups| groups.remove(&membership.group_id));
        if removed {
            if let Some(members) = self.members_of_group.get_mut(&membership.group_id) {
                members.remove(&membership.user_id);
            }
        }
        removed
    }

    fn remove_grant(&mut self, grant: Grant) -> bool {
        let removed = self
            .grants_by_resource
            .get_mut(&grant.resource_id)
            .is_some_and(|subjects| subjects.remove(&grant.subject));
        if removed {
            if let Some(resources) = self.grants_by_subject.get_mut(&grant.subject) {
                resources.remove(&grant.resource_id);
            }
        }
        removed
    }
}

/// In-memory grant store.
///
/// Reads are served from snapshots; writes validate the store invariants
/// and bump the revision:
///
/// - user and group id `0` are reserved
/// - ids and names are unique per entity kind
/// - memberships reference existing users and groups and are unique
/// - grants reference an existing resource and are unique per
///   `(resource, subject)`
///
/// Grant subjects are not required to exist; a grant to an unknown user or
/// group simply resolves to no access.
pub struct MemoryGrantStore {
    state: RwLock<Arc<StoreState>>,
}

impl std::fmt::Debug for MemoryGrantStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryGrantStore").finish_non_exhaustive()
    }
}

impl MemoryGrantStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(Arc::new(StoreState::default())),
        }
    }

    /// Create a store populated from a dataset.
    ///
    /// Entities load in dependency order (users, groups, resources,
    /// memberships, grants); the first invariant violation aborts the load.
    pub async fn from_dataset(dataset: Dataset) -> StoreResult<Self> {
        let store = Self::new();
        store.import(dataset).await?;
        Ok(store)
    }

    /// Create a store holding the sample scenario.
    pub async fn with_sample_data() -> StoreResult<Self> {
        Self::from_dataset(sample_dataset()).await
    }

    /// Create a store as described by configuration.
    ///
    /// A dataset path takes precedence over `seed_sample`; with neither the
    /// store starts empty.
    pub async fn from_config(config: &StoreConfig) -> StoreResult<Self> {
        config
            .validate()
            .map_err(|e| StoreError::Dataset(e.to_string()))?;

        if let Some(path) = &config.dataset_path {
            info!(path = %path.display(), "Loading ACL dataset");
            return Self::from_dataset(Dataset::from_path(path)?).await;
        }
        if config.seed_sample {
            info!("Seeding ACL store with sample data");
            return Self::with_sample_data().await;
        }
        Ok(Self::new())
    }

    /// Load a dataset into the store as a single write.
    pub async fn import(&self, dataset: Dataset) -> StoreResult<()> {
        let mut guard = self.state.write().await;
        let mut next = (**guard).clone();

        for user in dataset.users {
            next.check_user(&user)?;
            next.users.insert(user.id, user);
        }
        for group in dataset.groups {
            next.check_group(&group)?;
            next.groups.insert(group.id, group);
        }
        for resource in dataset.resources {
            next.check_resource(&resource)?;
            next.resources.insert(resource.id, resource);
        }
        for membership in dataset.memberships {
            next.check_membership(&membership)?;
            next.insert_membership(membership);
        }
        for grant in dataset.grants {
            next.check_grant(&grant)?;
            next.insert_grant(grant);
        }

        next.revision += 1;
        debug!(revision = next.revision, "Dataset imported");
        *guard = Arc::new(next);
        Ok(())
    }

    /// Add a user.
    pub async fn add_user(&self, user: User) -> StoreResult<()> {
        self.write(|state| {
            state.check_user(&user)?;
            debug!(user_id = %user.id, "User added");
            state.users.insert(user.id, user);
            Ok(())
        })
        .await
    }

    /// Add a group.
    pub async fn add_group(&self, group: Group) -> StoreResult<()> {
        self.write(|state| {
            state.check_group(&group)?;
            debug!(group_id = %group.id, "Group added");
            state.groups.insert(group.id, group);
            Ok(())
        })
        .await
    }

    /// Add a resource.
    pub async fn add_resource(&self, resource: Resource) -> StoreResult<()> {
        self.write(|state| {
            state.check_resource(&resource)?;
            debug!(resource_id = %resource.id, "Resource added");
            state.resources.insert(resource.id, resource);
            Ok(())
        })
        .await
    }

    /// Add a user to a group.
    pub async fn add_membership(&self, membership: Membership) -> StoreResult<()> {
        self.write(|state| {
            state.check_membership(&membership)?;
            debug!(
                user_id = %membership.user_id,
                group_id = %membership.group_id,
                "Membership added"
            );
            state.insert_membership(membership);
            Ok(())
        })
        .await
    }

    /// Remove a user from a group.
    ///
    /// Returns `false` (and leaves the revision unchanged) if the
    /// membership did not exist.
    pub async fn remove_membership(&self, membership: Membership) -> StoreResult<bool> {
        self.write_if_changed(|state| state.remove_membership(membership))
            .await
    }

    /// Share a resource.
    pub async fn share(&self, grant: Grant) -> StoreResult<()> {
        self.write(|state| {
            state.check_grant(&grant)?;
            debug!(grant = %grant, "Grant added");
            state.insert_grant(grant);
            Ok(())
        })
        .await
    }

    /// Share a resource using the legacy `(subject_id, is_group)` encoding.
    ///
    /// Negative subject ids and group grants to subject `0` are rejected as
    /// invariant violations.
    pub async fn share_raw(
        &self,
        resource_id: ResourceId,
        subject_id: i64,
        is_group: bool,
    ) -> StoreResult<()> {
        let grant = Grant::from_raw(resource_id, subject_id, is_group)?;
        self.share(grant).await
    }

    /// Revoke a grant.
    ///
    /// Returns `false` if no such grant existed.
    pub async fn revoke(&self, grant: Grant) -> StoreResult<bool> {
        self.write_if_changed(|state| state.remove_grant(grant)).await
    }

    /// Current store statistics.
    pub async fn stats(&self) -> StoreStats {
        let state = self.state.read().await;
        StoreStats {
            users: state.users.len(),
            groups: state.groups.len(),
            memberships: state.membership_count(),
            resources: state.resources.len(),
            grants: state.grant_count(),
            global_grants: state
                .grants_by_subject
                .get(&Subject::Everyone)
                .map_or(0, BTreeSet::len),
            revision: state.revision,
        }
    }

    async fn write<F>(&self, apply: F) -> StoreResult<()>
    where
        F: FnOnce(&mut StoreState) -> StoreResult<()>,
    {
        let mut guard = self.state.write().await;
        // `apply` validates before it mutates, so an error leaves the state
        // unchanged.
        let state = Arc::make_mut(&mut *guard);
        apply(state)?;
        state.revision += 1;
        Ok(())
    }

    async fn write_if_changed<F>(&self, apply: F) -> StoreResult<bool>
    where
        F: FnOnce(&mut StoreState) -> bool,
    {
        let mut guard = self.state.write().await;
        let state = Arc::make_mut(&mut *guard);
        let changed = apply(state);
        if changed {
            state.revision += 1;
        }
        Ok(changed)
    }
}

impl Default for MemoryGrantStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GrantStore for MemoryGrantStore {
    type Snapshot = MemorySnapshot;

    async fn snapshot(&self) -> StoreResult<MemorySnapshot> {
        let state = self.state.read().await.clone();
        Ok(MemorySnapshot { state })
    }
}

/// Immutable view of a [`MemoryGrantStore`].
#[derive(Debug, Clone)]
pub struct MemorySnapshot {
    state: Arc<StoreState>,
}

#[async_trait]
impl GrantSnapshot for MemorySnapshot {
    fn revision(&self) -> u64 {
        self.state.revision
    }

    async fn get_user(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.state.users.get(&id).cloned())
    }

    async fn get_resource(&self, id: ResourceId) -> StoreResult<Option<Resource>> {
        Ok(self.state.resources.get(&id).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.state.users.values().cloned().collect())
    }

    async fn list_resources(&self) -> StoreResult<Vec<Resource>> {
        Ok(self.state.resources.values().cloned().collect())
    }

    async fn list_group_ids_of_user(&self, user_id: UserId) -> StoreResult<BTreeSet<GroupId>> {
        Ok(self
            .state
            .groups_of_user
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_members_of_group(&self, group_id: GroupId) -> StoreResult<BTreeSet<UserId>> {
        Ok(self
            .state
            .members_of_group
            .get(&group_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_grants_for_resource(&self, resource_id: ResourceId) -> StoreResult<Vec<Grant>> {
        Ok(self
            .state
            .grants_by_resource
            .get(&resource_id)
            .map(|subjects| {
                subjects
                    .iter()
                    .map(|subject| Grant::new(resource_id, *subject))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn list_grants_for_subjects(&self, subjects: &[Subject]) -> StoreResult<Vec<Grant>> {
        let mut grants = Vec::new();
        for subject in subjects {
            if let Some(resources) = self.state.grants_by_subject.get(subject) {
                grants.extend(resources.iter().map(|r| Grant::new(*r, *subject)));
            }
        }
        Ok(grants)
    }

    async fn has_global_grant(&self, resource_id: ResourceId) -> StoreResult<bool> {
        Ok(self
            .state
            .grants_by_resource
            .get(&resource_id)
            .is_some_and(|subjects| subjects.contains(&Subject::Everyone)))
    }

    async fn list_all_grants(&self) -> StoreResult<Vec<Grant>> {
        Ok(self
            .state
            .grants_by_resource
            .iter()
            .flat_map(|(resource_id, subjects)| {
                subjects.iter().map(|subject| Grant::new(*resource_id, *subject))
            })
            .collect())
    }

    async fn total_user_count(&self) -> StoreResult<u64> {
        Ok(self.state.users.len() as u64)
    }
}
