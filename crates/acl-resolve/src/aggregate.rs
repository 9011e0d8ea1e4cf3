//! # Aggregation Engine
//!
//! Counts over the access relation, one direction at a time:
//!
//! - **Per resource**: a global share short-circuits to the total user
//!   count, so no edge is enumerated for it.
//! - **Per user**: each user needs its own count, so global shares are
//!   expanded through the [`AccessClosure`].
//!
//! The two strategies must agree with each other and with the list
//! queries; the crate tests check that they do.

use acl_model::{ResourceUserCount, UserId, UserResourceCount};
use acl_store::GrantSnapshot;
use std::collections::BTreeSet;
use tracing::{debug, instrument};

use crate::closure::AccessClosure;
use crate::error::QueryResult;
use crate::resolver::AccessResolver;

/// Computes count views over a single snapshot.
pub struct AggregationEngine<'a, S: ?Sized> {
    snapshot: &'a S,
}

impl<'a, S: GrantSnapshot + ?Sized> AggregationEngine<'a, S> {
    /// Create an engine over a snapshot.
    pub fn new(snapshot: &'a S) -> Self {
        Self { snapshot }
    }

    /// One row per resource with its distinct user count, ascending by
    /// resource id. Resources nobody can access report `0`.
    #[instrument(skip_all)]
    pub async fn resources_with_user_count(&self) -> QueryResult<Vec<ResourceUserCount>> {
        let resolver = AccessResolver::new(self.snapshot);
        let total_users = self.snapshot.total_user_count().await?;

        let resources = self.snapshot.list_resources().await?;
        let mut rows = Vec::with_capacity(resources.len());
        for resource in &resources {
            let user_count = if resolver.has_global_share(resource.id).await? {
                total_users
            } else {
                self.count_existing(resolver.shared_user_ids(resource.id).await?)
                    .await?
            };
            rows.push(ResourceUserCount::new(resource, user_count));
        }

        debug!(rows = rows.len(), "Counted users per resource");
        Ok(rows)
    }

    /// Number of ids naming a user the snapshot holds.
    async fn count_existing(&self, user_ids: BTreeSet<UserId>) -> QueryResult<u64> {
        let mut count = 0;
        for user_id in user_ids {
            if self.snapshot.get_user(user_id).await?.is_some() {
                count += 1;
            }
        }
        Ok(count)
    }

    /// One row per user with its distinct resource count, ascending by
    /// user id. Users with no access report `0`.
    pub async fn users_with_resource_count(&self) -> QueryResult<Vec<UserResourceCount>> {
        let closure = AccessResolver::new(self.snapshot).access_closure().await?;
        self.users_with_resource_count_in(&closure).await
    }

    /// Per-user counts from an already built closure.
    ///
    /// The closure must come from the same snapshot (or an identical
    /// revision) for the counts to be meaningful.
    #[instrument(skip_all, fields(edges = closure.len()))]
    pub async fn users_with_resource_count_in(
        &self,
        closure: &AccessClosure,
    ) -> QueryResult<Vec<UserResourceCount>> {
        let rows: Vec<_> = self
            .snapshot
            .list_users()
            .await?
            .iter()
            .map(|user| UserResourceCount::new(user, closure.resource_count_for(user.id)))
            .collect();

        debug!(rows = rows.len(), "Counted resources per user");
        Ok(rows)
    }
}
