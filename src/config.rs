// Copyright (c) 2025 - Cowboy AI, Inc.
//! Provisioner configuration

use serde::{Deserialize, Serialize};

use crate::errors::{ProvisionerError, ProvisionerResult};

fn default_timeout() -> u64 {
    30
}

fn default_hdfs_service_name() -> String {
    "cm_hdfs".to_string()
}

/// Configuration for the two redundant NameNodes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HdfsConfig {
    /// Base URL of the first NameNode (e.g., "http://nn1.example.com:9870")
    pub base_url_nn1: String,

    /// Base URL of the second NameNode
    pub base_url_nn2: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// WebHDFS `user.name` to send with every request, if any
    #[serde(default)]
    pub user_name: Option<String>,
}

impl Default for HdfsConfig {
    fn default() -> Self {
        Self {
            base_url_nn1: "http://localhost:9870".to_string(),
            base_url_nn2: "http://localhost:9871".to_string(),
            timeout_secs: 30,
            user_name: None,
        }
    }
}

/// Configuration for the Ranger policy engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangerConfig {
    /// Ranger admin base URL (e.g., "http://ranger.example.com:6080")
    pub base_url: String,

    /// Basic auth user
    pub username: String,

    /// Basic auth password
    #[serde(default)]
    pub password: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Name of the HDFS service registered in Ranger
    #[serde(default = "default_hdfs_service_name")]
    pub hdfs_service_name: String,

    /// Technical user set as admin of zones and roles
    pub owner_technical_user: String,
}

impl Default for RangerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:6080".to_string(),
            username: "admin".to_string(),
            password: String::new(),
            timeout_secs: 30,
            hdfs_service_name: default_hdfs_service_name(),
            owner_technical_user: "admin".to_string(),
        }
    }
}

fn default_user_search_filter() -> String {
    "(mail={mail})".to_string()
}

fn default_group_search_filter() -> String {
    "(&(objectClass=groupOfNames)(cn={group}))".to_string()
}

fn default_attribute_name() -> String {
    "cn".to_string()
}

/// Placeholder of the mail in the user search filter
pub const MAIL_PLACEHOLDER: &str = "{mail}";

/// Placeholder of the group name in the group search filter
pub const GROUP_PLACEHOLDER: &str = "{group}";

/// Configuration for the LDAP directory used to resolve principals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LdapConfig {
    /// LDAP URL (e.g., "ldap://ldap.example.com:389")
    pub url: String,

    /// Upgrade the connection with StartTLS
    #[serde(default)]
    pub use_tls: bool,

    /// Connection and operation timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// DN to bind as; anonymous when blank
    #[serde(default)]
    pub bind_username: String,

    #[serde(default)]
    pub bind_password: String,

    /// Base DN of user and group searches
    pub search_base_dn: String,

    /// Filter finding a user, with `{mail}` standing for the mail address
    #[serde(default = "default_user_search_filter")]
    pub user_search_filter: String,

    /// Filter finding a group, with `{group}` standing for the group name
    #[serde(default = "default_group_search_filter")]
    pub group_search_filter: String,

    /// Attribute holding the user id
    #[serde(default = "default_attribute_name")]
    pub user_attribute_name: String,

    /// Attribute holding the group name
    #[serde(default = "default_attribute_name")]
    pub group_attribute_name: String,
}

impl Default for LdapConfig {
    fn default() -> Self {
        Self {
            url: "ldap://localhost:389".to_string(),
            use_tls: false,
            timeout_secs: 30,
            bind_username: String::new(),
            bind_password: String::new(),
            search_base_dn: "dc=example,dc=com".to_string(),
            user_search_filter: default_user_search_filter(),
            group_search_filter: default_group_search_filter(),
            user_attribute_name: default_attribute_name(),
            group_attribute_name: default_attribute_name(),
        }
    }
}

impl LdapConfig {
    fn validate(&self) -> ProvisionerResult<()> {
        let required = [
            ("ldap.url", &self.url),
            ("ldap.search_base_dn", &self.search_base_dn),
            ("ldap.user_attribute_name", &self.user_attribute_name),
            ("ldap.group_attribute_name", &self.group_attribute_name),
        ];
        require_non_blank(&required)?;

        if !self.user_search_filter.contains(MAIL_PLACEHOLDER) {
            return Err(ProvisionerError::Configuration(format!(
                "ldap.user_search_filter must contain {}",
                MAIL_PLACEHOLDER
            )));
        }
        if !self.group_search_filter.contains(GROUP_PLACEHOLDER) {
            return Err(ProvisionerError::Configuration(format!(
                "ldap.group_search_filter must contain {}",
                GROUP_PLACEHOLDER
            )));
        }
        Ok(())
    }
}

/// Full provisioner configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvisionerConfig {
    pub hdfs: HdfsConfig,
    pub ranger: RangerConfig,

    /// Directory used to resolve principals; a static directory is used when absent
    #[serde(default)]
    pub ldap: Option<LdapConfig>,
}

impl ProvisionerConfig {
    /// Reject configurations that cannot work
    pub fn validate(&self) -> ProvisionerResult<()> {
        let required = [
            ("hdfs.base_url_nn1", &self.hdfs.base_url_nn1),
            ("hdfs.base_url_nn2", &self.hdfs.base_url_nn2),
            ("ranger.base_url", &self.ranger.base_url),
            ("ranger.username", &self.ranger.username),
            ("ranger.hdfs_service_name", &self.ranger.hdfs_service_name),
            ("ranger.owner_technical_user", &self.ranger.owner_technical_user),
        ];
        require_non_blank(&required)?;

        match &self.ldap {
            Some(ldap) => ldap.validate(),
            None => Ok(()),
        }
    }
}

fn require_non_blank(fields: &[(&str, &String)]) -> ProvisionerResult<()> {
    for (name, value) in fields {
        if value.trim().is_empty() {
            return Err(ProvisionerError::Configuration(format!(
                "{} must not be blank",
                name
            )));
        }
    }
    Ok(())
}
