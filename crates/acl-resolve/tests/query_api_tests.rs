//! End-to-end tests for the access query API.
//!
//! These tests drive `QueryApi` over an in-memory store seeded with the
//! sample scenario:
//!
//! ```text
//! users 1-4; groups 1-3; memberships 1->g1, 2->g1, 3->g2, 4->g3
//! r1 -> user2, group1, everyone
//! r2 -> group2
//! r3 -> user1
//! r4 -> everyone
//! r5 -> group1
//! r6 -> (nobody)
//! ```

use acl_model::{Grant, GroupId, Membership, Resource, ResourceId, Subject, User, UserId};
use acl_resolve::{NotFoundKind, QueryApi, QueryError, ResolverConfig};
use acl_store::{GrantSnapshot, GrantStore, MemoryGrantStore, StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;

async fn sample_api() -> QueryApi<MemoryGrantStore> {
    let store = MemoryGrantStore::with_sample_data()
        .await
        .expect("sample data should load");
    QueryApi::new(Arc::new(store))
}

fn user_ids(users: &[User]) -> Vec<u64> {
    users.iter().map(|u| u.id.get()).collect()
}

fn resource_ids(resources: &[Resource]) -> Vec<u64> {
    resources.iter().map(|r| r.id.get()).collect()
}

// =============================================================================
// Sample scenario
// =============================================================================

#[tokio::test]
async fn test_resource_access_lists() {
    let api = sample_api().await;

    let cases: [(u64, Vec<u64>); 6] = [
        (1, vec![1, 2, 3, 4]),
        (2, vec![3]),
        (3, vec![1]),
        (4, vec![1, 2, 3, 4]),
        (5, vec![1, 2]),
        (6, vec![]),
    ];
    for (resource, expected) in cases {
        let users = api
            .resource_access_list(ResourceId(resource))
            .await
            .unwrap();
        assert_eq!(user_ids(&users), expected, "resource {}", resource);
    }
}

#[tokio::test]
async fn test_user_resource_lists() {
    let api = sample_api().await;

    let resources = api.user_resource_list(UserId(1)).await.unwrap();
    assert_eq!(resource_ids(&resources), vec![1, 3, 4, 5]);

    let resources = api.user_resource_list(UserId(4)).await.unwrap();
    assert_eq!(resource_ids(&resources), vec![1, 4]);
}

#[tokio::test]
async fn test_resources_with_user_count_json() {
    let api = sample_api().await;
    let rows = api.resources_with_user_count().await.unwrap();

    assert_eq!(
        serde_json::to_value(&rows).unwrap(),
        serde_json::json!([
            {"id": 1, "name": "r1.pdf", "userCount": 4},
            {"id": 2, "name": "r2.pdf", "userCount": 1},
            {"id": 3, "name": "r3.md", "userCount": 1},
            {"id": 4, "name": "r4.md", "userCount": 4},
            {"id": 5, "name": "r5.md", "userCount": 2},
            {"id": 6, "name": "r6.md", "userCount": 0}
        ])
    );
}

#[tokio::test]
async fn test_users_with_resource_count_json() {
    let api = sample_api().await;
    let rows = api.users_with_resource_count().await.unwrap();

    assert_eq!(
        serde_json::to_value(&rows).unwrap(),
        serde_json::json!([
            {"id": 1, "name": "User1", "resourceCount": 4},
            {"id": 2, "name": "User2", "resourceCount": 3},
            {"id": 3, "name": "User3", "resourceCount": 3},
            {"id": 4, "name": "User4", "resourceCount": 2}
        ])
    );
}

#[tokio::test]
async fn test_access_list_json_shape() {
    let api = sample_api().await;
    let users = api.resource_access_list(ResourceId(2)).await.unwrap();

    assert_eq!(
        serde_json::to_value(&users).unwrap(),
        serde_json::json!([{"id": 3, "name": "User3"}])
    );
}

#[tokio::test]
async fn test_count_views_agree_with_list_views() {
    let api = sample_api().await;

    for row in api.users_with_resource_count().await.unwrap() {
        let listed = api.user_resource_list(row.id).await.unwrap();
        assert_eq!(row.resource_count, listed.len() as u64, "user {}", row.id);
    }
    for row in api.resources_with_user_count().await.unwrap() {
        let listed = api.resource_access_list(row.id).await.unwrap();
        assert_eq!(row.user_count, listed.len() as u64, "resource {}", row.id);
    }
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let api = sample_api().await;

    let err = api.resource_access_list(ResourceId(404)).await.unwrap_err();
    assert!(matches!(
        err,
        QueryError::NotFound(NotFoundKind::Resource(ResourceId(404)))
    ));
    assert_eq!(err.status_code(), 404);
    assert!(err.to_string().contains("resource_not_found: 404"));

    let err = api.user_resource_list(UserId(0)).await.unwrap_err();
    assert!(matches!(err, QueryError::NotFound(NotFoundKind::User(UserId(0)))));
    assert!(err.to_string().contains("user_not_found: 0"));

    assert!(api.can_access(ResourceId(1), UserId(404)).await.is_err());
}

/// Store whose snapshots cannot be taken.
struct DownStore;

/// Snapshot that fails every read.
struct DownSnapshot;

#[async_trait]
impl GrantStore for DownStore {
    type Snapshot = DownSnapshot;

    async fn snapshot(&self) -> StoreResult<DownSnapshot> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

fn offline<T>() -> StoreResult<T> {
    Err(StoreError::Unavailable("read timed out".to_string()))
}

#[async_trait]
impl GrantSnapshot for DownSnapshot {
    fn revision(&self) -> u64 {
        0
    }
    async fn get_user(&self, _id: UserId) -> StoreResult<Option<User>> {
        offline()
    }
    async fn get_resource(&self, _id: ResourceId) -> StoreResult<Option<Resource>> {
        offline()
    }
    async fn list_users(&self) -> StoreResult<Vec<User>> {
        offline()
    }
    async fn list_resources(&self) -> StoreResult<Vec<Resource>> {
        offline()
    }
    async fn list_group_ids_of_user(&self, _user_id: UserId) -> StoreResult<BTreeSet<GroupId>> {
        offline()
    }
    async fn list_members_of_group(&self, _group_id: GroupId) -> StoreResult<BTreeSet<UserId>> {
        offline()
    }
    async fn list_grants_for_resource(&self, _resource_id: ResourceId) -> StoreResult<Vec<Grant>> {
        offline()
    }
    async fn list_grants_for_subjects(&self, _subjects: &[Subject]) -> StoreResult<Vec<Grant>> {
        offline()
    }
    async fn has_global_grant(&self, _resource_id: ResourceId) -> StoreResult<bool> {
        offline()
    }
    async fn list_all_grants(&self) -> StoreResult<Vec<Grant>> {
        offline()
    }
    async fn total_user_count(&self) -> StoreResult<u64> {
        offline()
    }
}

#[tokio::test]
async fn test_store_failure_is_internal() {
    let api = QueryApi::new(Arc::new(DownStore));

    let err = api.resources_with_user_count().await.unwrap_err();
    assert!(err.is_server_error());
    assert_eq!(err.status_code(), 500);
    assert!(err.to_string().contains("database offline"));

    let err = api.user_resource_list(UserId(1)).await.unwrap_err();
    assert_eq!(err.error_code(), "INTERNAL_ERROR");
}

#[tokio::test]
async fn test_read_failure_is_internal() {
    let snapshot = DownSnapshot;
    let resolver = acl_resolve::AccessResolver::new(&snapshot);

    let err = resolver.access_closure().await.unwrap_err();
    assert!(err.is_server_error());
    assert!(err.to_string().contains("read timed out"));
}

// =============================================================================
// Live semantics
// =============================================================================

#[tokio::test]
async fn test_global_share_includes_users_added_later() {
    let api = sample_api().await;
    api.store()
        .add_user(User::new(UserId(5), "User5"))
        .await
        .unwrap();

    let users = api.resource_access_list(ResourceId(4)).await.unwrap();
    assert_eq!(user_ids(&users), vec![1, 2, 3, 4, 5]);

    let rows = api.resources_with_user_count().await.unwrap();
    assert_eq!(rows[3].user_count, 5);

    let resources = api.user_resource_list(UserId(5)).await.unwrap();
    assert_eq!(resource_ids(&resources), vec![1, 4]);
}

#[tokio::test]
async fn test_group_expansion_follows_membership_changes() {
    let api = sample_api().await;
    let store = api.store();

    store
        .add_membership(Membership::new(UserId(4), GroupId(1)))
        .await
        .unwrap();
    let users = api.resource_access_list(ResourceId(5)).await.unwrap();
    assert_eq!(user_ids(&users), vec![1, 2, 4]);

    store
        .remove_membership(Membership::new(UserId(1), GroupId(1)))
        .await
        .unwrap();
    let users = api.resource_access_list(ResourceId(5)).await.unwrap();
    assert_eq!(user_ids(&users), vec![2, 4]);
}

#[tokio::test]
async fn test_revoking_global_share_falls_back_to_explicit_grants() {
    let api = sample_api().await;
    api.store()
        .revoke(Grant::everyone(ResourceId(1)))
        .await
        .unwrap();

    // user2 directly, user1 and user2 through group1
    let users = api.resource_access_list(ResourceId(1)).await.unwrap();
    assert_eq!(user_ids(&users), vec![1, 2]);

    let rows = api.resources_with_user_count().await.unwrap();
    assert_eq!(rows[0].user_count, 2);
}

// =============================================================================
// Closure cache
// =============================================================================

#[tokio::test]
async fn test_cached_counts_track_writes() {
    let store = Arc::new(MemoryGrantStore::with_sample_data().await.unwrap());
    let api = QueryApi::with_config(
        store.clone(),
        ResolverConfig::default().with_closure_cache(true),
    );

    let before = api.users_with_resource_count().await.unwrap();
    let again = api.users_with_resource_count().await.unwrap();
    assert_eq!(before, again);
    assert_eq!(api.cache_stats().unwrap().hits, 1);

    store.share(Grant::everyone(ResourceId(6))).await.unwrap();

    let after = api.users_with_resource_count().await.unwrap();
    let counts: Vec<u64> = after.iter().map(|r| r.resource_count).collect();
    assert_eq!(counts, vec![5, 4, 4, 3]);
    assert_eq!(api.cache_stats().unwrap().misses, 2);
}

#[tokio::test]
async fn test_cached_apis_over_stores_at_same_revision() {
    let config = ResolverConfig::default().with_closure_cache(true);
    let sample = Arc::new(MemoryGrantStore::with_sample_data().await.unwrap());

    let mut dataset = acl_store::sample_dataset();
    dataset.grants.clear();
    let bare = Arc::new(MemoryGrantStore::from_dataset(dataset).await.unwrap());

    let sample_api = QueryApi::with_config(sample, config.clone());
    let bare_api = QueryApi::with_config(bare, config);
    assert_eq!(
        sample_api.revision().await.unwrap(),
        bare_api.revision().await.unwrap()
    );

    let sample_counts = sample_api.users_with_resource_count().await.unwrap();
    let bare_counts = bare_api.users_with_resource_count().await.unwrap();

    assert_eq!(sample_counts[0].resource_count, 4);
    assert!(bare_counts.iter().all(|row| row.resource_count == 0));
}

#[tokio::test]
async fn test_cache_disabled_by_default() {
    let api = sample_api().await;
    api.users_with_resource_count().await.unwrap();
    assert!(api.cache_stats().is_none());
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_each_call_reads_one_snapshot() {
    let api = Arc::new(sample_api().await);

    let writer = {
        let api = api.clone();
        tokio::spawn(async move {
            for id in 10..60 {
                api.store()
                    .add_user(User::new(UserId(id), format!("User{}", id)))
                    .await
                    .unwrap();
                tokio::task::yield_now().await;
            }
        })
    };

    let mut readers = Vec::new();
    for _ in 0..4 {
        let api = api.clone();
        readers.push(tokio::spawn(async move {
            for _ in 0..25 {
                let rows = api.resources_with_user_count().await.unwrap();
                // r1 and r4 are both global: within one call they must see
                // the same user population.
                assert_eq!(rows[0].user_count, rows[3].user_count);

                let users = api.users_with_resource_count().await.unwrap();
                let everyone_sees_globals = users.iter().all(|row| row.resource_count >= 2);
                assert!(everyone_sees_globals);
                tokio::task::yield_now().await;
            }
        }));
    }

    writer.await.unwrap();
    for reader in readers {
        reader.await.unwrap();
    }

    let rows = api.resources_with_user_count().await.unwrap();
    assert_eq!(rows[0].user_count, 54);
}
