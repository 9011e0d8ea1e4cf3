//! Closure cache
//!
//! Holds at most one [`AccessClosure`], tagged with the store revision it
//! was built from. A lookup hits only on an exact revision match; since
//! every grant, membership or user change produces a new revision, any
//! change invalidates the whole cache.

use acl_store::GrantSnapshot;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::closure::AccessClosure;
use crate::error::QueryResult;
use crate::resolver::AccessResolver;

/// Cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from the cache
    pub hits: u64,
    /// Lookups that rebuilt the closure
    pub misses: u64,
}

/// Single-entry, revision-keyed closure cache.
///
/// Revisions only identify state within one store, so a cache belongs to
/// exactly one store. [`QueryApi`](crate::QueryApi) owns its cache
/// alongside its store for that reason.
#[derive(Debug, Default)]
pub(crate) struct ClosureCache {
    slot: RwLock<Option<(u64, Arc<AccessClosure>)>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ClosureCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the closure for the snapshot's revision, building it on a
    /// miss.
    pub async fn get_or_build<S>(&self, snapshot: &S) -> QueryResult<Arc<AccessClosure>>
    where
        S: GrantSnapshot + ?Sized,
    {
        let revision = snapshot.revision();

        if let Some((cached, closure)) = &*self.slot.read().await {
            if *cached == revision {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(revision, "Closure cache hit");
                return Ok(closure.clone());
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let closure = Arc::new(AccessResolver::new(snapshot).access_closure().await?);

        let mut slot = self.slot.write().await;
        // A slower caller on an older snapshot must not evict a newer entry.
        let newer_cached = matches!(&*slot, Some((cached, _)) if *cached > revision);
        if !newer_cached {
            *slot = Some((revision, closure.clone()));
            debug!(revision, edges = closure.len(), "Closure cache filled");
        }

        Ok(closure)
    }

    /// Revision of the cached closure, if any.
    #[cfg(test)]
    pub async fn cached_revision(&self) -> Option<u64> {
        self.slot.read().await.as_ref().map(|(revision, _)| *revision)
    }

    /// Hit/miss counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
