//! JSON datasets
//!
//! A dataset is a plain export of the store tables. Grants use the legacy
//! `(resource_id, subject_id, is_group)` columns, so rows exported from the
//! original schema load unchanged:
//!
//! ```json
//! {
//!   "users": [{"id": 1, "name": "User1"}],
//!   "groups": [{"id": 1, "name": "Group1"}],
//!   "memberships": [{"user_id": 1, "group_id": 1}],
//!   "resources": [{"id": 1, "name": "r1.pdf"}],
//!   "grants": [{"resource_id": 1, "subject_id": 0, "is_group": false}]
//! }
//! ```

use acl_model::{Grant, Group, Membership, Resource, User};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::StoreResult;

/// Store contents in import/export form.
///
/// Every section is optional in JSON. Invariants are checked when the
/// dataset is loaded into a store, not when it is parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// Users
    #[serde(default)]
    pub users: Vec<User>,

    /// Groups
    #[serde(default)]
    pub groups: Vec<Group>,

    /// User-group memberships
    #[serde(default)]
    pub memberships: Vec<Membership>,

    /// Resources
    #[serde(default)]
    pub resources: Vec<Resource>,

    /// Grants
    #[serde(default)]
    pub grants: Vec<Grant>,
}

impl Dataset {
    /// Parse a dataset from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Json`](crate::StoreError::Json) for malformed
    /// documents, including grants with a negative subject id or a group
    /// grant to subject `0`.
    pub fn from_json_str(json: &str) -> StoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a dataset file.
    pub fn from_path(path: impl AsRef<Path>) -> StoreResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> StoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use acl_model::{Resource, ResourceId, User, UserId};

    #[test]
    fn test_parse_partial_document() {
        let dataset = Dataset::from_json_str(
            r#"{
                "users": [{"id": 1, "name": "User1"}],
                "resources": [{"id": 3, "name": "r3.md"}],
                "grants": [{"resource_id": 3, "subject_id": 1, "is_group": false}]
            }"#,
        )
        .unwrap();

        assert_eq!(dataset.users.len(), 1);
        assert!(dataset.groups.is_empty());
        assert!(dataset.memberships.is_empty());
        assert_eq!(dataset.grants, vec![Grant::direct(ResourceId(3), UserId(1))]);
    }

    #[test]
    fn test_invalid_grant_is_parse_error() {
        let err = Dataset::from_json_str(
            r#"{"grants": [{"resource_id": 1, "subject_id": 0, "is_group": true}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Dataset::from_path("/nonexistent/acl-dataset.json").unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }

    #[test]
    fn test_sample_survives_json() {
        let sample = crate::sample::sample_dataset();
        let json = sample.to_json_pretty().unwrap();
        assert_eq!(Dataset::from_json_str(&json).unwrap(), sample);
    }

    #[test]
    fn test_max_ids_survive_json() {
        let dataset = Dataset {
            users: vec![User::new(UserId(u64::MAX), "last")],
            resources: vec![Resource::new(ResourceId(1), "r1.pdf")],
            grants: vec![
                Grant::direct(ResourceId(1), UserId(u64::MAX)),
                Grant::direct(ResourceId(1), UserId(i64::MAX as u64)),
            ],
            ..Dataset::default()
        };

        let back = Dataset::from_json_str(&dataset.to_json_pretty().unwrap()).unwrap();
        assert_eq!(back.grants, dataset.grants);
        assert_eq!(back, dataset);
    }
}
