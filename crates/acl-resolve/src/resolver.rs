//! # Access Resolver
//!
//! Turns grants into access answers against one store snapshot.
//!
//! The two list queries never materialize the full relation. A global
//! grant short-circuits the per-resource list to "every current user";
//! the per-user list asks the store for grants whose subject is the user,
//! one of the user's groups, or everyone.
//!
//! [`AccessResolver::access_closure`] is the one place global grants are
//! expanded into concrete edges, because per-user counting needs per-user
//! granularity.

use acl_model::{AccessEdge, GroupId, Resource, ResourceId, Subject, User, UserId};
use acl_store::GrantSnapshot;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument};

use crate::closure::AccessClosure;
use crate::error::{QueryError, QueryResult};

/// Resolves the access relation over a single snapshot.
///
/// Every method reads only from the snapshot it was created with, so all
/// answers from one resolver are mutually consistent.
pub struct AccessResolver<'a, S: ?Sized> {
    snapshot: &'a S,
}

impl<'a, S: GrantSnapshot + ?Sized> AccessResolver<'a, S> {
    /// Create a resolver over a snapshot.
    pub fn new(snapshot: &'a S) -> Self {
        Self { snapshot }
    }

    /// Fetch a resource or fail with `NotFound(resource)`.
    pub async fn require_resource(&self, resource_id: ResourceId) -> QueryResult<Resource> {
        self.snapshot
            .get_resource(resource_id)
            .await?
            .ok_or_else(|| QueryError::resource_not_found(resource_id))
    }

    /// Fetch a user or fail with `NotFound(user)`.
    pub async fn require_user(&self, user_id: UserId) -> QueryResult<User> {
        self.snapshot
            .get_user(user_id)
            .await?
            .ok_or_else(|| QueryError::user_not_found(user_id))
    }

    /// Whether the resource is shared with everyone.
    pub async fn has_global_share(&self, resource_id: ResourceId) -> QueryResult<bool> {
        Ok(self.snapshot.has_global_grant(resource_id).await?)
    }

    /// Users who can access a resource, ascending by id.
    ///
    /// A global share yields every user in the snapshot, evaluated now
    /// rather than when the grant was made. Otherwise the result is the
    /// union of direct grantees and members of granted groups.
    ///
    /// # Errors
    ///
    /// `NotFound(resource)` if the resource does not exist.
    pub async fn resource_access_list(&self, resource_id: ResourceId) -> QueryResult<Vec<User>> {
        self.require_resource(resource_id).await?;
        self.users_with_access(resource_id).await
    }

    /// Access list for a resource already known to exist.
    #[instrument(skip_all, fields(resource_id = %resource_id))]
    pub(crate) async fn users_with_access(&self, resource_id: ResourceId) -> QueryResult<Vec<User>> {
        if self.has_global_share(resource_id).await? {
            let users = self.snapshot.list_users().await?;
            debug!(rows = users.len(), "Global share, listing all users");
            return Ok(users);
        }

        let user_ids = self.shared_user_ids(resource_id).await?;
        let mut users = Vec::with_capacity(user_ids.len());
        for user_id in user_ids {
            match self.snapshot.get_user(user_id).await? {
                Some(user) => users.push(user),
                None => debug!(user_id = %user_id, "Skipping grant to unknown user"),
            }
        }

        debug!(rows = users.len(), "Resolved resource access list");
        Ok(users)
    }

    /// Resources a user can access, ascending by id.
    ///
    /// # Errors
    ///
    /// `NotFound(user)` if the user does not exist.
    pub async fn user_resource_list(&self, user_id: UserId) -> QueryResult<Vec<Resource>> {
        self.require_user(user_id).await?;
        self.resources_accessible_by(user_id).await
    }

    /// Resource list for a user already known to exist.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub(crate) async fn resources_accessible_by(
        &self,
        user_id: UserId,
    ) -> QueryResult<Vec<Resource>> {
        let group_ids = self.snapshot.list_group_ids_of_user(user_id).await?;
        let mut subjects = vec![Subject::Everyone, Subject::Direct(user_id)];
        subjects.extend(group_ids.into_iter().map(Subject::Group));

        let resource_ids: BTreeSet<ResourceId> = self
            .snapshot
            .list_grants_for_subjects(&subjects)
            .await?
            .into_iter()
            .map(|grant| grant.resource_id)
            .collect();

        let mut resources = Vec::with_capacity(resource_ids.len());
        for resource_id in resource_ids {
            match self.snapshot.get_resource(resource_id).await? {
                Some(resource) => resources.push(resource),
                None => debug!(resource_id = %resource_id, "Skipping grant on unknown resource"),
            }
        }

        debug!(rows = resources.len(), "Resolved user resource list");
        Ok(resources)
    }

    /// Whether a user can access a resource.
    ///
    /// # Errors
    ///
    /// `NotFound` if either id does not exist.
    pub async fn can_access(&self, resource_id: ResourceId, user_id: UserId) -> QueryResult<bool> {
        self.require_resource(resource_id).await?;
        let resources = self.user_resource_list(user_id).await?;
        Ok(resources.iter().any(|r| r.id == resource_id))
    }

    /// Materialize every access edge.
    ///
    /// Direct grants contribute one edge, group grants one edge per member,
    /// and global grants one edge per user in the snapshot. Edges naming a
    /// user or resource the snapshot does not hold are dropped.
    #[instrument(skip_all)]
    pub async fn access_closure(&self) -> QueryResult<AccessClosure> {
        let user_ids: BTreeSet<UserId> = self
            .snapshot
            .list_users()
            .await?
            .into_iter()
            .map(|user| user.id)
            .collect();
        let resource_ids: BTreeSet<ResourceId> = self
            .snapshot
            .list_resources()
            .await?
            .into_iter()
            .map(|resource| resource.id)
            .collect();

        let mut members: BTreeMap<GroupId, BTreeSet<UserId>> = BTreeMap::new();
        let mut closure = AccessClosure::new();

        for grant in self.snapshot.list_all_grants().await? {
            let resource_id = grant.resource_id;
            if !resource_ids.contains(&resource_id) {
                continue;
            }
            match grant.subject {
                Subject::Direct(user_id) => {
                    if user_ids.contains(&user_id) {
                        closure.insert(AccessEdge::new(resource_id, user_id));
                    }
                }
                Subject::Group(group_id) => {
                    if !members.contains_key(&group_id) {
                        let group_members = self.snapshot.list_members_of_group(group_id).await?;
                        members.insert(group_id, group_members);
                    }
                    let group_members = members.get(&group_id).into_iter().flatten();
                    closure.extend(
                        group_members
                            .filter(|user_id| user_ids.contains(*user_id))
                            .map(|user_id| AccessEdge::new(resource_id, *user_id)),
                    );
                }
                Subject::Everyone => {
                    closure.extend(
                        user_ids
                            .iter()
                            .map(|user_id| AccessEdge::new(resource_id, *user_id)),
                    );
                }
            }
        }

        debug!(edges = closure.len(), "Built access closure");
        Ok(closure)
    }

    /// Distinct user ids reached by direct and group grants on a resource.
    ///
    /// Global grants are not expanded and ids are not checked against the
    /// user table.
    pub(crate) async fn shared_user_ids(
        &self,
        resource_id: ResourceId,
    ) -> QueryResult<BTreeSet<UserId>> {
        let mut user_ids = BTreeSet::new();
        for grant in self.snapshot.list_grants_for_resource(resource_id).await? {
            match grant.subject {
                Subject::Direct(user_id) => {
                    user_ids.insert(user_id);
                }
                Subject::Group(group_id) => {
                    user_ids.extend(self.snapshot.list_members_of_group(group_id).await?);
                }
                Subject::Everyone => {}
            }
        }
        Ok(user_ids)
    }
}
