// Copyright (c) 2025 - Cowboy AI, Inc.
//! LDAP Directory
//!
//! [`LdapDirectory`] answers directory lookups with one subtree search per
//! query. The search itself sits behind [`LdapSearch`]; [`Ldap3Search`] runs
//! it over a fresh `ldap3` connection.

use async_trait::async_trait;
use ldap3::{LdapConnAsync, LdapConnSettings, Scope, SearchEntry};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, warn};

use super::{DirectoryGroup, DirectoryLookup, DirectoryUser};
use crate::config::{LdapConfig, GROUP_PLACEHOLDER, MAIL_PLACEHOLDER};
use crate::errors::{FailedOperation, Problem, ProvisionResult};

/// Attributes of a search entry, keyed by attribute name
pub type LdapEntry = HashMap<String, Vec<String>>;

const MAIL_ATTRIBUTE: &str = "mail";

/// A failed LDAP search
#[derive(Debug, Error)]
pub enum LdapSearchError {
    #[error(transparent)]
    Ldap(#[from] ldap3::LdapError),

    #[error("attribute '{0}' is missing from the entry")]
    MissingAttribute(String),
}

/// Raw LDAP search contract
#[async_trait]
pub trait LdapSearch: Send + Sync {
    /// First entry under `base` matching `filter`, with only `attributes` loaded
    async fn search_first(
        &self,
        base: &str,
        filter: &str,
        attributes: &[&str],
    ) -> Result<Option<LdapEntry>, LdapSearchError>;
}

/// [`LdapSearch`] opening one `ldap3` connection per search
pub struct Ldap3Search {
    url: String,
    use_tls: bool,
    timeout: Duration,
    bind_username: String,
    bind_password: String,
}

impl Ldap3Search {
    pub fn new(config: &LdapConfig) -> Self {
        Self {
            url: config.url.clone(),
            use_tls: config.use_tls,
            timeout: Duration::from_secs(config.timeout_secs),
            bind_username: config.bind_username.clone(),
            bind_password: config.bind_password.clone(),
        }
    }
}

#[async_trait]
impl LdapSearch for Ldap3Search {
    async fn search_first(
        &self,
        base: &str,
        filter: &str,
        attributes: &[&str],
    ) -> Result<Option<LdapEntry>, LdapSearchError> {
        let settings = LdapConnSettings::new()
            .set_conn_timeout(self.timeout)
            .set_starttls(self.use_tls);
        let (conn, mut ldap) = LdapConnAsync::with_settings(settings, &self.url).await?;
        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!("LDAP connection error: {}", e);
            }
        });

        if !self.bind_username.is_empty() {
            ldap.simple_bind(&self.bind_username, &self.bind_password)
                .await?
                .success()?;
        }

        let (entries, _) = ldap
            .with_timeout(self.timeout)
            .search(base, Scope::Subtree, filter, attributes.to_vec())
            .await?
            .success()?;

        if let Err(e) = ldap.unbind().await {
            warn!("LDAP unbind failed: {}", e);
        }

        Ok(entries
            .into_iter()
            .next()
            .map(|entry| SearchEntry::construct(entry).attrs))
    }
}

/// [`DirectoryLookup`] backed by an LDAP server
pub struct LdapDirectory<S> {
    search: S,
    config: LdapConfig,
}

impl LdapDirectory<Ldap3Search> {
    /// Directory searching the server described by `config`
    pub fn connect(config: LdapConfig) -> Self {
        Self::new(Ldap3Search::new(&config), config)
    }
}

impl<S: LdapSearch> LdapDirectory<S> {
    pub fn new(search: S, config: LdapConfig) -> Self {
        Self { search, config }
    }
}

/// `kind` is "user" or "group"
fn ldap_failure(kind: &str, name: &str, err: &LdapSearchError) -> FailedOperation {
    let message = format!(
        "An error occurred while searching for the {} '{}' on LDAP. Please try again and if the error persists contact the platform team. Details: {}",
        kind, name, err
    );
    error!("{}", message);
    FailedOperation::single(Problem::with_cause(message, err))
}

fn render_filter(template: &str, placeholder: &str, value: &str) -> String {
    template.replace(placeholder, &ldap3::ldap_escape(value))
}

/// First value of an attribute; servers may return names in any case
fn attribute(entry: &LdapEntry, name: &str) -> Result<String, LdapSearchError> {
    entry
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .and_then(|(_, values)| values.first())
        .cloned()
        .ok_or_else(|| LdapSearchError::MissingAttribute(name.to_string()))
}

impl<S: LdapSearch> LdapDirectory<S> {
    async fn search_user(&self, mail: &str) -> Result<Option<DirectoryUser>, LdapSearchError> {
        let filter = render_filter(&self.config.user_search_filter, MAIL_PLACEHOLDER, mail);
        let id_attribute = self.config.user_attribute_name.as_str();
        let entry = self
            .search
            .search_first(
                &self.config.search_base_dn,
                &filter,
                &[id_attribute, MAIL_ATTRIBUTE],
            )
            .await?;

        match entry {
            Some(entry) => Ok(Some(DirectoryUser {
                id: attribute(&entry, id_attribute)?,
                mail: attribute(&entry, MAIL_ATTRIBUTE)?,
            })),
            None => Ok(None),
        }
    }

    async fn search_group(&self, name: &str) -> Result<Option<DirectoryGroup>, LdapSearchError> {
        let filter = render_filter(&self.config.group_search_filter, GROUP_PLACEHOLDER, name);
        let name_attribute = self.config.group_attribute_name.as_str();
        let entry = self
            .search
            .search_first(&self.config.search_base_dn, &filter, &[name_attribute])
            .await?;

        match entry {
            Some(entry) => Ok(Some(DirectoryGroup {
                name: attribute(&entry, name_attribute)?,
            })),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl<S: LdapSearch> DirectoryLookup for LdapDirectory<S> {
    async fn find_user_by_mail(&self, mail: &str) -> ProvisionResult<Option<DirectoryUser>> {
        debug!("Searching LDAP for user with mail {}", mail);
        self.search_user(mail)
            .await
            .map_err(|e| ldap_failure("user", mail, &e))
    }

    async fn find_group_by_name(&self, name: &str) -> ProvisionResult<Option<DirectoryGroup>> {
        debug!("Searching LDAP for group {}", name);
        self.search_group(name)
            .await
            .map_err(|e| ldap_failure("group", name, &e))
    }
}
