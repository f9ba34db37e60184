// Copyright (c) 2025 - Cowboy AI, Inc.
//! Directory identities resolved from platform subjects

use serde::{Deserialize, Serialize};

/// A concrete principal found in the directory service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CdpIdentity {
    /// A user, identified on the cluster by `user_id`
    User { user_id: String, mail: String },

    /// A group
    Group { name: String },
}

impl CdpIdentity {
    /// Principal name as used in Ranger role memberships
    pub fn principal_name(&self) -> &str {
        match self {
            CdpIdentity::User { user_id, .. } => user_id,
            CdpIdentity::Group { name } => name,
        }
    }
}

/// Split identities into `(users, groups)` principal names, keeping order
pub fn partition_identities<'a>(
    identities: impl IntoIterator<Item = &'a CdpIdentity>,
) -> (Vec<String>, Vec<String>) {
    let mut users = Vec::new();
    let mut groups = Vec::new();
    for identity in identities {
        match identity {
            CdpIdentity::User { user_id, .. } => users.push(user_id.clone()),
            CdpIdentity::Group { name } => groups.push(name.clone()),
        }
    }
    (users, groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition() {
        let identities = vec![
            CdpIdentity::User {
                user_id: "alice".to_string(),
                mail: "alice@example.com".to_string(),
            },
            CdpIdentity::Group {
                name: "devs".to_string(),
            },
        ];

        let (users, groups) = partition_identities(&identities);
        assert_eq!(users, vec!["alice"]);
        assert_eq!(groups, vec!["devs"]);
        assert_eq!(identities[1].principal_name(), "devs");
    }
}
