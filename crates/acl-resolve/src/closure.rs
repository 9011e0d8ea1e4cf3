//! # Access Closure
//!
//! The fully materialized access relation: every `(resource, user)` edge,
//! with global grants expanded to one edge per user. Only per-user
//! aggregation needs it; the list queries resolve without it.

use acl_model::{AccessEdge, ResourceId, UserId};
use std::collections::{BTreeMap, BTreeSet};

/// Distinct access edges with a per-user index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessClosure {
    edges: BTreeSet<AccessEdge>,
    by_user: BTreeMap<UserId, BTreeSet<ResourceId>>,
}

impl AccessClosure {
    /// Create an empty closure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an edge. Returns `false` if it was already present.
    pub fn insert(&mut self, edge: AccessEdge) -> bool {
        if !self.edges.insert(edge) {
            return false;
        }
        self.by_user
            .entry(edge.user_id)
            .or_default()
            .insert(edge.resource_id);
        true
    }

    /// Number of distinct edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the closure has no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Whether `user_id` can access `resource_id`.
    pub fn contains(&self, resource_id: ResourceId, user_id: UserId) -> bool {
        self.edges.contains(&AccessEdge::new(resource_id, user_id))
    }

    /// All edges, ordered by resource then user.
    pub fn edges(&self) -> impl Iterator<Item = &AccessEdge> {
        self.edges.iter()
    }

    /// Resources a user can access, ascending.
    pub fn resources_of(&self, user_id: UserId) -> impl Iterator<Item = ResourceId> + '_ {
        self.by_user
            .get(&user_id)
            .into_iter()
            .flat_map(|resources| resources.iter().copied())
    }

    /// Number of distinct resources a user can access.
    pub fn resource_count_for(&self, user_id: UserId) -> u64 {
        self.by_user
            .get(&user_id)
            .map_or(0, |resources| resources.len() as u64)
    }

    /// Users who can access a resource, ascending.
    pub fn users_of(&self, resource_id: ResourceId) -> impl Iterator<Item = UserId> + '_ {
        let start = AccessEdge::new(resource_id, UserId(u64::MIN));
        let end = AccessEdge::new(resource_id, UserId(u64::MAX));
        self.edges.range(start..=end).map(|edge| edge.user_id)
    }
}

impl FromIterator<AccessEdge> for AccessClosure {
    fn from_iter<I: IntoIterator<Item = AccessEdge>>(iter: I) -> Self {
        let mut closure = Self::new();
        closure.extend(iter);
        closure
    }
}

impl Extend<AccessEdge> for AccessClosure {
    fn extend<I: IntoIterator<Item = AccessEdge>>(&mut self, iter: I) {
        for edge in iter {
            self.insert(edge);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(resource: u64, user: u64) -> AccessEdge {
        AccessEdge::new(ResourceId(resource), UserId(user))
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        let mut closure = AccessClosure::new();
        assert!(closure.insert(edge(1, 2)));
        assert!(!closure.insert(edge(1, 2)));
        assert_eq!(closure.len(), 1);
        assert_eq!(closure.resource_count_for(UserId(2)), 1);
    }

    #[test]
    fn test_projections() {
        let closure: AccessClosure = [edge(1, 1), edge(1, 3), edge(2, 1), edge(4, 1)]
            .into_iter()
            .collect();

        assert_eq!(
            closure.resources_of(UserId(1)).collect::<Vec<_>>(),
            vec![ResourceId(1), ResourceId(2), ResourceId(4)]
        );
        assert_eq!(
            closure.users_of(ResourceId(1)).collect::<Vec<_>>(),
            vec![UserId(1), UserId(3)]
        );
        assert_eq!(closure.users_of(ResourceId(3)).count(), 0);
        assert_eq!(closure.resource_count_for(UserId(9)), 0);
        assert!(closure.contains(ResourceId(2), UserId(1)));
        assert!(!closure.contains(ResourceId(2), UserId(3)));
    }

    #[test]
    fn test_empty() {
        let closure = AccessClosure::new();
        assert!(closure.is_empty());
        assert_eq!(closure.edges().count(), 0);
    }
}
