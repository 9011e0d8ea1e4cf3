//! # Grants
//!
//! A grant shares one resource with one subject. The subject is either a
//! specific user, a specific group, or everyone.
//!
//! Stored records use the legacy `(resource_id, subject_id, is_group)`
//! triple, where subject id `0` with `is_group = false` means "everyone".
//! [`Grant`] keeps that encoding at the serialization boundary only; in
//! memory the three cases are the variants of [`Subject`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::ids::{GroupId, ResourceId, UserId};

/// Errors raised when a raw grant triple cannot describe a valid grant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Subject ids are non-negative
    #[error("Negative subject id: {0}")]
    NegativeSubjectId(i128),

    /// Subject id does not fit a `u64` id
    #[error("Subject id out of range: {0}")]
    SubjectIdOutOfRange(i128),

    /// Subject id 0 is reserved for everyone and cannot name a group
    #[error("Subject id 0 cannot be a group (resource {0})")]
    EveryoneAsGroup(ResourceId),
}

/// Result type for model conversions.
pub type ModelResult<T> = Result<T, ModelError>;

/// The target of a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Subject {
    /// Shared with one user.
    Direct(UserId),
    /// Shared with every current member of a group.
    Group(GroupId),
    /// Shared with every current user.
    Everyone,
}

impl Subject {
    /// Raw subject id reserved for [`Subject::Everyone`].
    pub const EVERYONE_ID: u64 = 0;

    /// Get the raw `(subject_id, is_group)` encoding.
    pub fn to_raw(self) -> (u64, bool) {
        match self {
            Subject::Direct(user_id) => (user_id.get(), false),
            Subject::Group(group_id) => (group_id.get(), true),
            Subject::Everyone => (Self::EVERYONE_ID, false),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Direct(user_id) => write!(f, "user:{}", user_id),
            Subject::Group(group_id) => write!(f, "group:{}", group_id),
            Subject::Everyone => write!(f, "everyone"),
        }
    }
}

/// A resource shared with a subject.
///
/// Grants are unique per `(resource, subject)`; the store enforces this on
/// insert.
///
/// # Example
///
/// ```
/// use acl_model::{Grant, ResourceId, Subject, UserId};
///
/// let grant = Grant::direct(ResourceId(3), UserId(1));
/// assert_eq!(grant.to_string(), "3->user:1");
///
/// let json = serde_json::to_value(&grant).unwrap();
/// assert_eq!(json["subject_id"], 1);
/// assert_eq!(json["is_group"], false);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGrant", into = "RawGrant")]
pub struct Grant {
    /// The shared resource.
    pub resource_id: ResourceId,
    /// Who the resource is shared with.
    pub subject: Subject,
}

impl Grant {
    /// Create a grant for an arbitrary subject.
    pub fn new(resource_id: ResourceId, subject: Subject) -> Self {
        Self {
            resource_id,
            subject,
        }
    }

    /// Share a resource with one user.
    pub fn direct(resource_id: ResourceId, user_id: UserId) -> Self {
        Self::new(resource_id, Subject::Direct(user_id))
    }

    /// Share a resource with a group.
    pub fn group(resource_id: ResourceId, group_id: GroupId) -> Self {
        Self::new(resource_id, Subject::Group(group_id))
    }

    /// Share a resource with everyone.
    pub fn everyone(resource_id: ResourceId) -> Self {
        Self::new(resource_id, Subject::Everyone)
    }

    /// Whether this grant shares the resource with everyone.
    pub fn is_global(&self) -> bool {
        matches!(self.subject, Subject::Everyone)
    }

    /// Decode a legacy `(resource_id, subject_id, is_group)` triple.
    ///
    /// # Errors
    ///
    /// - [`ModelError::NegativeSubjectId`] if `subject_id < 0`
    /// - [`ModelError::EveryoneAsGroup`] for `(0, true)`
    pub fn from_raw(resource_id: ResourceId, subject_id: i64, is_group: bool) -> ModelResult<Self> {
        Self::from_wire(resource_id, i128::from(subject_id), is_group)
    }

    /// Decode a wire triple, whose subject id spans the full `u64` range.
    fn from_wire(resource_id: ResourceId, subject_id: i128, is_group: bool) -> ModelResult<Self> {
        if subject_id < 0 {
            return Err(ModelError::NegativeSubjectId(subject_id));
        }
        let id =
            u64::try_from(subject_id).map_err(|_| ModelError::SubjectIdOutOfRange(subject_id))?;
        let subject = match (id, is_group) {
            (Subject::EVERYONE_ID, false) => Subject::Everyone,
            (Subject::EVERYONE_ID, true) => return Err(ModelError::EveryoneAsGroup(resource_id)),
            (id, false) => Subject::Direct(UserId(id)),
            (id, true) => Subject::Group(GroupId(id)),
        };
        Ok(Self::new(resource_id, subject))
    }

    /// Encode as a legacy `(resource_id, subject_id, is_group)` triple.
    pub fn to_raw(&self) -> (ResourceId, u64, bool) {
        let (subject_id, is_group) = self.subject.to_raw();
        (self.resource_id, subject_id, is_group)
    }
}

impl fmt::Display for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.resource_id, self.subject)
    }
}

/// Wire form of a grant.
///
/// `subject_id` is wider than the legacy column so every `u64` id
/// survives a round trip.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawGrant {
    resource_id: ResourceId,
    subject_id: i128,
    #[serde(default)]
    is_group: bool,
}

impl TryFrom<RawGrant> for Grant {
    type Error = ModelError;

    fn try_from(raw: RawGrant) -> Result<Self, Self::Error> {
        Grant::from_wire(raw.resource_id, raw.subject_id, raw.is_group)
    }
}

impl From<Grant> for RawGrant {
    fn from(grant: Grant) -> Self {
        let (resource_id, subject_id, is_group) = grant.to_raw();
        Self {
            resource_id,
            subject_id: i128::from(subject_id),
            is_group,
        }
    }
}
