//! # ACL Store
//!
//! This crate provides the read-only grant store consumed by the resolution
//! core, plus an in-memory implementation for single-process services and
//! tests.
//!
//! ## Overview
//!
//! The acl-store crate handles:
//! - **Store traits**: `GrantStore` hands out point-in-time `GrantSnapshot`s
//! - **Memory store**: Copy-on-write in-memory store with a write path that
//!   enforces the grant invariants
//! - **Datasets**: JSON import of users, groups, memberships, resources and
//!   grants
//! - **Sample data**: The reference four-user, six-resource scenario
//!
//! ## Features
//!
//! - `memory` (default): In-memory `MemoryGrantStore`
//!
//! ## Snapshots
//!
//! Every read goes through a snapshot. A snapshot never changes after it is
//! taken, so one resolution call sees one consistent state even while
//! writers run:
//!
//! ```text
//! GrantStore::snapshot() ─→ GrantSnapshot (revision N)
//!                               ├─ get_user / get_resource
//!                               ├─ list_users / list_resources
//!                               ├─ list_group_ids_of_user / list_members_of_group
//!                               ├─ list_grants_for_resource / list_grants_for_subjects
//!                               ├─ has_global_grant
//!                               ├─ list_all_grants
//!                               └─ total_user_count
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use acl_model::{Grant, ResourceId};
//! use acl_store::{GrantSnapshot, GrantStore, MemoryGrantStore};
//!
//! async fn example() -> acl_store::StoreResult<()> {
//!     let store = MemoryGrantStore::with_sample_data().await?;
//!
//!     let snapshot = store.snapshot().await?;
//!     assert!(snapshot.has_global_grant(ResourceId(4)).await?);
//!
//!     store.share(Grant::everyone(ResourceId(6))).await?;
//!
//!     // The old snapshot is unchanged
//!     assert!(!snapshot.has_global_grant(ResourceId(6)).await?);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dataset;
pub mod error;
#[cfg(feature = "memory")]
pub mod memory;
pub mod sample;
pub mod store;

// Re-export main types
pub use config::{ConfigError, StoreConfig};
pub use dataset::Dataset;
pub use error::{StoreError, StoreResult};
#[cfg(feature = "memory")]
pub use memory::{MemoryGrantStore, MemorySnapshot, StoreStats};
pub use sample::sample_dataset;
pub use store::{GrantSnapshot, GrantStore};
