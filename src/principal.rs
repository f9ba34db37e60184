// Copyright (c) 2025 - Cowboy AI, Inc.
//! Principal Resolver
//!
//! Maps platform subjects to directory identities:
//!
//! ```text
//! user:<local>_<domain>  →  find_user_by_mail("<local>@<domain>")
//! group:<name>           →  find_group_by_name("<name>")
//! ```
//!
//! The mail is rebuilt by splitting on the *last* underscore. A local part
//! that itself contains underscores before the domain boundary is mapped to
//! the wrong address; callers must supply subjects in this exact shape.

use async_trait::async_trait;
use futures::future::join_all;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, error};

use crate::directory::DirectoryLookup;
use crate::domain::CdpIdentity;
use crate::errors::{FailedOperation, ProvisionResult};

const USER_PREFIX: &str = "user:";
const GROUP_PREFIX: &str = "group:";

/// Resolution outcome of every subject, keyed by the subject itself
pub type Resolution = HashMap<String, ProvisionResult<CdpIdentity>>;

/// Principal resolution contract
#[async_trait]
pub trait PrincipalResolver: Send + Sync {
    /// Resolve every subject independently; one failure never aborts the others
    async fn resolve(&self, subjects: &BTreeSet<String>) -> Resolution;
}

/// Resolver backed by a [`DirectoryLookup`]
pub struct DirectoryPrincipalResolver {
    directory: Arc<dyn DirectoryLookup>,
}

impl DirectoryPrincipalResolver {
    pub fn new(directory: Arc<dyn DirectoryLookup>) -> Self {
        Self { directory }
    }

    async fn resolve_one(&self, subject: &str) -> ProvisionResult<CdpIdentity> {
        if let Some(user) = subject.strip_prefix(USER_PREFIX) {
            let mail = mail_from_subject(subject, user)?;
            self.map_user(&mail).await
        } else if let Some(group) = subject.strip_prefix(GROUP_PREFIX) {
            self.map_group(group).await
        } else {
            let message = format!(
                "The subject {} is neither a Witboost user nor a group",
                subject
            );
            error!("{}", message);
            Err(FailedOperation::message(message))
        }
    }

    async fn map_user(&self, mail: &str) -> ProvisionResult<CdpIdentity> {
        match self.directory.find_user_by_mail(mail).await? {
            Some(user) => Ok(CdpIdentity::User {
                user_id: user.id,
                mail: user.mail,
            }),
            None => Err(FailedOperation::message(format!(
                "The user {} was not found on LDAP",
                mail
            ))),
        }
    }

    async fn map_group(&self, name: &str) -> ProvisionResult<CdpIdentity> {
        match self.directory.find_group_by_name(name).await? {
            Some(group) => Ok(CdpIdentity::Group { name: group.name }),
            None => Err(FailedOperation::message(format!(
                "The group {} was not found on LDAP",
                name
            ))),
        }
    }
}

#[async_trait]
impl PrincipalResolver for DirectoryPrincipalResolver {
    async fn resolve(&self, subjects: &BTreeSet<String>) -> Resolution {
        debug!("Resolving {} subjects", subjects.len());

        let lookups = subjects.iter().map(|subject| async move {
            (subject.clone(), self.resolve_one(subject).await)
        });

        join_all(lookups).await.into_iter().collect()
    }
}

/// `alice_example.com` → `alice@example.com`
fn mail_from_subject(subject: &str, user: &str) -> ProvisionResult<String> {
    match user.rsplit_once('_') {
        Some((local, domain)) => Ok(format!("{}@{}", local, domain)),
        None => {
            let message = format!(
                "The subject {} has not the expected format for a user",
                subject
            );
            error!("{}", message);
            Err(FailedOperation::message(message))
        }
    }
}

/// Split a resolution into resolved identities and the accumulated problems
///
/// Identities are returned in subject order.
pub fn split_resolution(resolution: Resolution) -> (Vec<CdpIdentity>, Option<FailedOperation>) {
    let mut entries: Vec<_> = resolution.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut identities = Vec::new();
    let mut problems = Vec::new();
    for (_, outcome) in entries {
        match outcome {
            Ok(identity) => identities.push(identity),
            Err(failed) => problems.extend(failed.into_problems()),
        }
    }

    let failure = if problems.is_empty() {
        None
    } else {
        Some(FailedOperation::new(problems))
    };
    (identities, failure)
}
