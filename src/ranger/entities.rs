// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure constructors and merges of Ranger entities
//!
//! Merges never clobber remote state the provisioner does not own:
//!
//! - Roles keep every admin member; only regular members are replaced.
//! - Zones keep every path already registered for the service.
//! - Policies keep their id and every field not set here.

use std::collections::HashSet;
use std::hash::Hash;

use super::model::{
    PolicyItem, PolicyItemAccess, PolicyResource, RangerPolicy, RangerRole, RangerSecurityZone,
    RoleMember, SecurityZoneService, PATH_RESOURCE,
};
use crate::domain::sanitize;

const SERVICE_TYPE: &str = "HDFS";
const AUTOGENERATED_LABEL: &str = "autogenerated";
const POLICY_PRIORITY_NORMAL: i32 = 0;

/// `<prefix>_owner`, sanitized
pub fn owner_role_name(prefix: &str) -> String {
    sanitize(&format!("{}_owner", prefix))
}

/// `<prefix>_read`, sanitized
pub fn user_role_name(prefix: &str) -> String {
    sanitize(&format!("{}_read", prefix))
}

/// `<prefix>_access_policy`, sanitized
pub fn policy_name(prefix: &str) -> String {
    sanitize(&format!("{}_access_policy", prefix))
}

/// Policy resource covering everything under `path`
pub fn policy_folder_path(path: &str) -> String {
    format!("{}*", path)
}

/// New role: the given members plus the deploy user as admin
pub fn new_role(name: &str, users: &[String], groups: &[String], deploy_user: &str) -> RangerRole {
    RangerRole {
        id: None,
        name: sanitize(name),
        description: String::new(),
        is_enabled: true,
        users: users
            .iter()
            .map(RoleMember::member)
            .chain(std::iter::once(RoleMember::admin(deploy_user)))
            .collect(),
        groups: groups.iter().map(RoleMember::member).collect(),
        extra: Default::default(),
    }
}

/// Replace the regular members of `existing`, keeping its admin members
pub fn merge_role(mut existing: RangerRole, users: &[String], groups: &[String]) -> RangerRole {
    existing.users = replace_members(&existing.users, users);
    existing.groups = replace_members(&existing.groups, groups);
    existing
}

fn replace_members(existing: &[RoleMember], names: &[String]) -> Vec<RoleMember> {
    distinct(
        names
            .iter()
            .map(RoleMember::member)
            .chain(existing.iter().filter(|m| m.is_admin).cloned()),
    )
}

/// New security zone granting `path` on `service`
pub fn new_security_zone(
    name: &str,
    service: &str,
    deploy_user: &str,
    path: &str,
) -> RangerSecurityZone {
    RangerSecurityZone {
        id: None,
        name: sanitize(name),
        services: [(service.to_string(), SecurityZoneService::with_path(path))]
            .into_iter()
            .collect(),
        admin_users: vec![deploy_user.to_string()],
        audit_users: vec![deploy_user.to_string()],
        extra: Default::default(),
    }
}

/// Add `path` to the paths `existing` already grants on `service`
pub fn merge_security_zone(
    mut existing: RangerSecurityZone,
    service: &str,
    path: &str,
) -> RangerSecurityZone {
    let merged = match existing.services.remove(service) {
        Some(current) => SecurityZoneService {
            extra: current.extra.clone(),
            ..SecurityZoneService::with_paths(distinct(
                current.paths().cloned().chain(std::iter::once(path.to_string())),
            ))
        },
        None => SecurityZoneService::with_path(path),
    };
    existing.services.insert(service.to_string(), merged);
    existing
}

/// New access policy
///
/// The owner role gets READ and WRITE, the user role READ; everything else
/// is denied.
pub fn new_policy(
    prefix: &str,
    zone_name: &str,
    folder_path: &str,
    owner_role: &str,
    user_role: &str,
    service: &str,
) -> RangerPolicy {
    merge_policy(
        RangerPolicy::default(),
        prefix,
        zone_name,
        folder_path,
        owner_role,
        user_role,
        service,
    )
}

/// Rewrite `existing` in place, keeping its id
pub fn merge_policy(
    mut existing: RangerPolicy,
    prefix: &str,
    zone_name: &str,
    folder_path: &str,
    owner_role: &str,
    user_role: &str,
    service: &str,
) -> RangerPolicy {
    let name = policy_name(prefix);

    existing.service = service.to_string();
    existing.description = name.clone();
    existing.name = name;
    existing.is_audit_enabled = true;
    existing.is_enabled = true;
    existing.resources = [(
        PATH_RESOURCE.to_string(),
        PolicyResource {
            values: vec![folder_path.to_string()],
            is_excludes: false,
            is_recursive: true,
        },
    )]
    .into_iter()
    .collect();
    existing.policy_items = vec![
        PolicyItem {
            accesses: vec![PolicyItemAccess::allow("READ"), PolicyItemAccess::allow("WRITE")],
            roles: vec![owner_role.to_string()],
            ..PolicyItem::default()
        },
        PolicyItem {
            accesses: vec![PolicyItemAccess::allow("READ")],
            roles: vec![user_role.to_string()],
            ..PolicyItem::default()
        },
    ];
    existing.service_type = Some(SERVICE_TYPE.to_string());
    existing.policy_labels = vec![AUTOGENERATED_LABEL.to_string()];
    existing.is_deny_all_else = true;
    existing.zone_name = Some(zone_name.to_string());
    existing.policy_priority = POLICY_PRIORITY_NORMAL;
    existing
}

/// Drop duplicates, keeping the first occurrence
fn distinct<T: Clone + Eq + Hash>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
