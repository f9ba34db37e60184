// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Ranger Entity Merges
//!
//! Provisioning calls repeat against state other tools may have touched.
//! Merges must keep admin members and already registered zone paths, and
//! must never introduce duplicates.

use hdfs_provisioner::ranger::entities::{merge_role, merge_security_zone, new_security_zone};
use hdfs_provisioner::ranger::model::{RangerRole, RoleMember};
use proptest::prelude::*;
use std::collections::HashSet;

const SERVICE: &str = "cm_hdfs";

fn member() -> impl Strategy<Value = RoleMember> {
    ("[a-e]{1,2}", any::<bool>()).prop_map(|(name, is_admin)| RoleMember { name, is_admin })
}

fn role(users: Vec<RoleMember>, groups: Vec<RoleMember>) -> RangerRole {
    RangerRole {
        id: Some(1),
        name: "dp_read".to_string(),
        is_enabled: true,
        users,
        groups,
        ..RangerRole::default()
    }
}

proptest! {
    #[test]
    fn prop_role_merge_keeps_every_admin(
        existing in prop::collection::vec(member(), 0..8),
        names in prop::collection::vec("[a-e]{1,2}", 0..8),
    ) {
        let merged = merge_role(role(existing.clone(), Vec::new()), &names, &[]);

        for admin in existing.iter().filter(|m| m.is_admin) {
            prop_assert!(merged.users.contains(admin));
        }
    }

    #[test]
    fn prop_role_merge_replaces_regular_members(
        existing in prop::collection::vec(member(), 0..8),
        names in prop::collection::vec("[a-e]{1,2}", 0..8),
    ) {
        let merged = merge_role(role(Vec::new(), existing), &[], &names);

        let regular: HashSet<&str> = merged
            .groups
            .iter()
            .filter(|m| !m.is_admin)
            .map(|m| m.name.as_str())
            .collect();
        let expected: HashSet<&str> = names.iter().map(String::as_str).collect();
        prop_assert_eq!(regular, expected);
    }

    #[test]
    fn prop_role_merge_has_no_duplicates(
        existing in prop::collection::vec(member(), 0..8),
        names in prop::collection::vec("[a-e]{1,2}", 0..8),
    ) {
        let merged = merge_role(role(existing, Vec::new()), &names, &[]);

        let unique: HashSet<&RoleMember> = merged.users.iter().collect();
        prop_assert_eq!(unique.len(), merged.users.len());
    }

    #[test]
    fn prop_zone_merge_is_a_union(
        paths in prop::collection::vec("/[a-d]{1,3}", 1..6),
        new_path in "/[a-d]{1,3}",
    ) {
        let mut zone = new_security_zone("zone", SERVICE, "deployer", &paths[0]);
        for path in &paths[1..] {
            zone = merge_security_zone(zone, SERVICE, path);
        }
        let merged = merge_security_zone(zone, SERVICE, &new_path);

        let result: Vec<&String> = merged.services[SERVICE].paths().collect();
        let unique: HashSet<&String> = result.iter().copied().collect();
        prop_assert_eq!(unique.len(), result.len());
        prop_assert!(result.contains(&&new_path));
        for path in &paths {
            prop_assert!(result.contains(&path));
        }
    }
}
