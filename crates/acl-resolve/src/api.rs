//! Query API
//!
//! The four stable access queries. Each call takes exactly one store
//! snapshot, checks that referenced ids exist, and delegates to the
//! resolver or the aggregation engine.

use acl_model::{Resource, ResourceId, ResourceUserCount, User, UserId, UserResourceCount};
use acl_store::{GrantSnapshot, GrantStore};
use std::sync::Arc;
use tracing::{debug, error, instrument};

use crate::aggregate::AggregationEngine;
use crate::cache::{CacheStats, ClosureCache};
use crate::config::ResolverConfig;
use crate::error::QueryResult;
use crate::resolver::AccessResolver;

/// Access query service over a grant store.
///
/// Calls are independent and side-effect free apart from the optional
/// closure cache, so one `QueryApi` can serve many concurrent callers.
pub struct QueryApi<S> {
    /// Backing store
    store: Arc<S>,

    /// Query settings
    config: ResolverConfig,

    /// Present when `config.cache_closure` is set
    cache: Option<ClosureCache>,
}

impl<S> std::fmt::Debug for QueryApi<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryApi")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S: GrantStore> QueryApi<S> {
    /// Create a query API with default configuration.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, ResolverConfig::default())
    }

    /// Create a query API with explicit configuration.
    pub fn with_config(store: Arc<S>, config: ResolverConfig) -> Self {
        let cache = config.cache_closure.then(ClosureCache::new);
        Self {
            store,
            config,
            cache,
        }
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The active configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Closure cache counters, if caching is enabled.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(ClosureCache::stats)
    }

    /// Users who can access a resource, as `[{id, name}]` ascending by id.
    ///
    /// # Errors
    ///
    /// `NotFound(resource)` if the resource does not exist.
    #[instrument(skip_all, fields(resource_id = %resource_id))]
    pub async fn resource_access_list(&self, resource_id: ResourceId) -> QueryResult<Vec<User>> {
        let result = async {
            let snapshot = self.store.snapshot().await?;
            let resolver = AccessResolver::new(&snapshot);
            resolver.require_resource(resource_id).await?;
            resolver.users_with_access(resource_id).await
        }
        .await;
        log_outcome("resource_access_list", result)
    }

    /// Resources a user can access, as `[{id, name}]` ascending by id.
    ///
    /// # Errors
    ///
    /// `NotFound(user)` if the user does not exist.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn user_resource_list(&self, user_id: UserId) -> QueryResult<Vec<Resource>> {
        let result = async {
            let snapshot = self.store.snapshot().await?;
            let resolver = AccessResolver::new(&snapshot);
            resolver.require_user(user_id).await?;
            resolver.resources_accessible_by(user_id).await
        }
        .await;
        log_outcome("user_resource_list", result)
    }

    /// Every resource with its user count, as `[{id, name, userCount}]`
    /// ascending by id.
    #[instrument(skip_all)]
    pub async fn resources_with_user_count(&self) -> QueryResult<Vec<ResourceUserCount>> {
        let result = async {
            let snapshot = self.store.snapshot().await?;
            AggregationEngine::new(&snapshot)
                .resources_with_user_count()
                .await
        }
        .await;
        log_outcome("resources_with_user_count", result)
    }

    /// Every user with their resource count, as `[{id, name,
    /// resourceCount}]` ascending by id.
    #[instrument(skip_all)]
    pub async fn users_with_resource_count(&self) -> QueryResult<Vec<UserResourceCount>> {
        let result = async {
            let snapshot = self.store.snapshot().await?;
            let engine = AggregationEngine::new(&snapshot);
            match &self.cache {
                Some(cache) => {
                    let closure = cache.get_or_build(&snapshot).await?;
                    engine.users_with_resource_count_in(&closure).await
                }
                None => engine.users_with_resource_count().await,
            }
        }
        .await;
        log_outcome("users_with_resource_count", result)
    }

    /// Whether a user can access a resource.
    ///
    /// # Errors
    ///
    /// `NotFound` if either id does not exist.
    #[instrument(skip_all, fields(resource_id = %resource_id, user_id = %user_id))]
    pub async fn can_access(&self, resource_id: ResourceId, user_id: UserId) -> QueryResult<bool> {
        let result = async {
            let snapshot = self.store.snapshot().await?;
            AccessResolver::new(&snapshot)
                .can_access(resource_id, user_id)
                .await
        }
        .await;
        log_outcome("can_access", result)
    }

    /// Store revision the next query would read.
    pub async fn revision(&self) -> QueryResult<u64> {
        Ok(self.store.snapshot().await?.revision())
    }
}

fn log_outcome<T>(operation: &'static str, result: QueryResult<T>) -> QueryResult<T> {
    if let Err(err) = &result {
        if err.is_server_error() {
            error!(operation, error = %err, "Access query failed");
        } else {
            debug!(operation, error = %err, "Access query rejected");
        }
    }
    result
}
