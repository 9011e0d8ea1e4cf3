//! # ACL Model
//!
//! Domain types for resolving who may access which resource, shared by the
//! store and resolver crates.
//!
//! ## Overview
//!
//! The acl-model crate handles:
//! - **Identities**: `UserId`, `GroupId` and `ResourceId` newtypes
//! - **Entities**: Users, groups, memberships and resources
//! - **Grants**: A resource shared with a user, a group, or everyone
//! - **Access edges**: The derived `(resource, user)` relation
//! - **Views**: Serializable result rows for the count queries
//!
//! ## Architecture
//!
//! ```text
//! Grant = Resource + Subject
//!
//! Subject:
//!   Direct(user)    - one edge to that user
//!   Group(group)    - one edge per current group member
//!   Everyone        - one edge per current user
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use acl_model::{Grant, GroupId, ResourceId, Subject, UserId};
//!
//! let direct = Grant::direct(ResourceId(1), UserId(2));
//! let group = Grant::group(ResourceId(1), GroupId(1));
//! let global = Grant::everyone(ResourceId(1));
//!
//! assert_eq!(direct.subject, Subject::Direct(UserId(2)));
//! assert!(global.is_global());
//! assert!(!group.is_global());
//!
//! // Legacy (resource_id, subject_id, is_group) triples convert both ways
//! assert_eq!(Grant::from_raw(ResourceId(1), 0, false).unwrap(), global);
//! assert_eq!(group.to_raw(), (ResourceId(1), 1, true));
//! ```

pub mod edge;
pub mod entities;
pub mod grant;
pub mod ids;
pub mod views;

// Re-export main types for convenience
pub use edge::AccessEdge;
pub use entities::{Group, Membership, Resource, User};
pub use grant::{Grant, ModelError, ModelResult, Subject};
pub use ids::{GroupId, ResourceId, UserId};
pub use views::{ResourceUserCount, UserResourceCount};
