// Copyright (c) 2025 - Cowboy AI, Inc.
//! Directory Lookup
//!
//! The provisioner resolves platform subjects against a directory service.
//! Only two queries are needed: a user by mail and a group by name.
//!
//! [`StaticDirectory`] serves those queries from a YAML document:
//!
//! ```yaml
//! users:
//!   - id: alice
//!     mail: alice@example.com
//! groups:
//!   - devs
//! ```
//!
//! [`LdapDirectory`] serves them from an LDAP server.

pub mod ldap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::errors::{ProvisionResult, ProvisionerError, ProvisionerResult};

pub use ldap::{Ldap3Search, LdapDirectory, LdapSearch, LdapSearchError};

/// A user known to the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryUser {
    pub id: String,
    pub mail: String,
}

/// A group known to the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryGroup {
    pub name: String,
}

/// Directory lookup contract
///
/// `Ok(None)` means the principal does not exist; `Err` means the lookup
/// itself failed.
#[async_trait]
pub trait DirectoryLookup: Send + Sync {
    /// Find a user by mail address
    async fn find_user_by_mail(&self, mail: &str) -> ProvisionResult<Option<DirectoryUser>>;

    /// Find a group by name
    async fn find_group_by_name(&self, name: &str) -> ProvisionResult<Option<DirectoryGroup>>;
}

/// In-memory directory loaded from YAML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticDirectory {
    #[serde(default)]
    pub users: Vec<DirectoryUser>,
    #[serde(default)]
    pub groups: Vec<String>,
}

impl StaticDirectory {
    /// Parse a directory document
    pub fn from_yaml_str(yaml: &str) -> ProvisionerResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a directory document from disk
    pub fn from_file(path: impl AsRef<Path>) -> ProvisionerResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ProvisionerError::Directory(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }
}

#[async_trait]
impl DirectoryLookup for StaticDirectory {
    async fn find_user_by_mail(&self, mail: &str) -> ProvisionResult<Option<DirectoryUser>> {
        debug!("Looking up user with mail {}", mail);
        Ok(self
            .users
            .iter()
            .find(|user| user.mail.eq_ignore_ascii_case(mail))
            .cloned())
    }

    async fn find_group_by_name(&self, name: &str) -> ProvisionResult<Option<DirectoryGroup>> {
        debug!("Looking up group {}", name);
        Ok(self
            .groups
            .iter()
            .find(|group| group.as_str() == name)
            .map(|group| DirectoryGroup {
                name: group.clone(),
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIRECTORY: &str = r#"
users:
  - id: alice
    mail: Alice@Example.com
groups:
  - devs
"#;

    #[tokio::test]
    async fn test_static_directory_lookups() {
        let directory = StaticDirectory::from_yaml_str(DIRECTORY).unwrap();

        let user = directory
            .find_user_by_mail("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.id, "alice");

        assert!(directory
            .find_user_by_mail("bob@example.com")
            .await
            .unwrap()
            .is_none());

        let group = directory.find_group_by_name("devs").await.unwrap();
        assert_eq!(
            group,
            Some(DirectoryGroup {
                name: "devs".to_string()
            })
        );
        assert!(directory.find_group_by_name("ops").await.unwrap().is_none());
    }

    #[test]
    fn test_invalid_document() {
        let err = StaticDirectory::from_yaml_str("users: 3").unwrap_err();
        assert!(matches!(err, ProvisionerError::Directory(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = StaticDirectory::from_file("/nonexistent/directory.yaml").unwrap_err();
        assert!(err.to_string().contains("Cannot read"));
    }
}
