//! Sample scenario
//!
//! Four users, three groups, six resources:
//!
//! ```text
//! Memberships: User1, User2 -> Group1; User3 -> Group2; User4 -> Group3
//!
//! r1.pdf  -> User2, Group1, everyone
//! r2.pdf  -> Group2
//! r3.md   -> User1
//! r4.md   -> everyone
//! r5.md   -> Group1
//! r6.md   -> (nobody)
//! ```

use acl_model::{Grant, Group, GroupId, Membership, Resource, ResourceId, User, UserId};

use crate::dataset::Dataset;

/// Build the sample dataset.
pub fn sample_dataset() -> Dataset {
    let users = (1..=4)
        .map(|i| User::new(UserId(i), format!("User{}", i)))
        .collect();
    let groups = (1..=3)
        .map(|i| Group::new(GroupId(i), format!("Group{}", i)))
        .collect();
    let memberships = vec![
        Membership::new(UserId(1), GroupId(1)),
        Membership::new(UserId(2), GroupId(1)),
        Membership::new(UserId(3), GroupId(2)),
        Membership::new(UserId(4), GroupId(3)),
    ];
    let resources = ["r1.pdf", "r2.pdf", "r3.md", "r4.md", "r5.md", "r6.md"]
        .into_iter()
        .zip(1..)
        .map(|(name, id)| Resource::new(ResourceId(id), name))
        .collect();
    let grants = vec![
        Grant::direct(ResourceId(1), UserId(2)),
        Grant::group(ResourceId(1), GroupId(1)),
        Grant::everyone(ResourceId(1)),
        Grant::group(ResourceId(2), GroupId(2)),
        Grant::direct(ResourceId(3), UserId(1)),
        Grant::everyone(ResourceId(4)),
        Grant::group(ResourceId(5), GroupId(1)),
    ];

    Dataset {
        users,
        groups,
        memberships,
        resources,
        grants,
    }
}
