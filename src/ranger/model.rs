// Copyright (c) 2025 - Cowboy AI, Inc.
//! Ranger REST v2 entities
//!
//! Only the fields the provisioner reads or writes are modeled. Every other
//! field returned by Ranger is kept in `extra` and sent back untouched on
//! update.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resource key of HDFS paths, in zones and policies
pub const PATH_RESOURCE: &str = "path";

/// Member of a role
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleMember {
    pub name: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl RoleMember {
    pub fn member(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_admin: false,
        }
    }

    pub fn admin(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_admin: true,
        }
    }
}

/// Ranger role
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangerRole {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "enabled")]
    pub is_enabled: bool,
    #[serde(default)]
    pub users: Vec<RoleMember>,
    #[serde(default)]
    pub groups: Vec<RoleMember>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Resources of one service within a security zone
///
/// Each entry maps a resource key (e.g., `path`) to its values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityZoneService {
    #[serde(default)]
    pub resources: Vec<BTreeMap<String, Vec<String>>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SecurityZoneService {
    /// Service granting a single path
    pub fn with_path(path: impl Into<String>) -> Self {
        Self::with_paths(vec![path.into()])
    }

    pub fn with_paths(paths: Vec<String>) -> Self {
        let mut resource = BTreeMap::new();
        resource.insert(PATH_RESOURCE.to_string(), paths);
        Self {
            resources: vec![resource],
            extra: Default::default(),
        }
    }

    /// Every path value across all resources
    pub fn paths(&self) -> impl Iterator<Item = &String> {
        self.resources
            .iter()
            .filter_map(|resource| resource.get(PATH_RESOURCE))
            .flatten()
    }
}

/// Ranger security zone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangerSecurityZone {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub services: BTreeMap<String, SecurityZoneService>,
    #[serde(default)]
    pub admin_users: Vec<String>,
    #[serde(default)]
    pub audit_users: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Resource matched by a policy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyResource {
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub is_excludes: bool,
    #[serde(default)]
    pub is_recursive: bool,
}

/// Access type granted by a policy item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyItemAccess {
    #[serde(rename = "type")]
    pub access_type: String,
    #[serde(default = "enabled")]
    pub is_allowed: bool,
}

impl PolicyItemAccess {
    pub fn allow(access_type: &str) -> Self {
        Self {
            access_type: access_type.to_string(),
            is_allowed: true,
        }
    }
}

/// Grant of accesses to users, groups and roles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyItem {
    #[serde(default)]
    pub accesses: Vec<PolicyItemAccess>,
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub delegate_admin: bool,
}

/// Ranger access policy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangerPolicy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub service: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_audit_enabled: bool,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub resources: BTreeMap<String, PolicyResource>,
    #[serde(default)]
    pub policy_items: Vec<PolicyItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(default)]
    pub policy_labels: Vec<String>,
    #[serde(default)]
    pub is_deny_all_else: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_name: Option<String>,
    #[serde(default)]
    pub policy_priority: i32,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn enabled() -> bool {
    true
}
