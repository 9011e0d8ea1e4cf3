//! # ACL Resolve
//!
//! This crate computes who may access what from three kinds of sharing
//! grants and exposes four query views over the result.
//!
//! ## Overview
//!
//! The acl-resolve crate handles:
//! - **AccessResolver**: Per-resource and per-user access lists, plus the
//!   fully materialized access closure
//! - **AggregationEngine**: User counts per resource and resource counts
//!   per user
//! - **QueryApi**: The stable query surface with existence checks
//! - **Closure cache**: Optional revision-keyed reuse of the closure,
//!   owned by each `QueryApi`
//!
//! ## Architecture
//!
//! ```text
//! GrantStore ──snapshot──→ AccessResolver ──┐
//!                     └──→ AggregationEngine ┴──→ QueryApi
//! ```
//!
//! Data flows one way; nothing here writes to the store.
//!
//! ## Global Shares
//!
//! A resource shared with everyone is handled two ways:
//! - Per-resource views short-circuit: the access list is every current
//!   user and the user count is the total user count
//! - Per-user counts expand the grant into one edge per user in the
//!   access closure
//!
//! Both must describe the same relation. Access is always evaluated
//! against the users and memberships that exist at query time.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use acl_model::{ResourceId, UserId};
//! use acl_resolve::QueryApi;
//! use acl_store::MemoryGrantStore;
//! use std::sync::Arc;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryGrantStore::with_sample_data().await?);
//!     let api = QueryApi::new(store);
//!
//!     let users = api.resource_access_list(ResourceId(2)).await?;
//!     assert_eq!(users.len(), 1);
//!
//!     let resources = api.user_resource_list(UserId(1)).await?;
//!     println!("{}", serde_json::to_string(&resources)?);
//!
//!     for row in api.resources_with_user_count().await? {
//!         println!("{} {} {}", row.id, row.name, row.user_count);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! - `ACL_CACHE_CLOSURE`: Reuse the access closure while the store
//!   revision is unchanged (see [`ResolverConfig::from_env`])

pub mod aggregate;
pub mod api;
pub mod cache;
pub mod closure;
pub mod config;
pub mod error;
pub mod resolver;

// Re-export main types
pub use aggregate::AggregationEngine;
pub use api::QueryApi;
pub use cache::CacheStats;
pub use closure::AccessClosure;
pub use config::ResolverConfig;
pub use error::{NotFoundKind, QueryError, QueryResult};
pub use resolver::AccessResolver;
