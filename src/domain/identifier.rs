// Copyright (c) 2025 - Cowboy AI, Inc.
//! Component Identifier Value Object
//!
//! Component ids are URNs with exactly seven `:`-delimited segments:
//!
//! ```text
//! urn:dmb:cmp:<domain>:<dataProductId>:<majorVersion>:<componentId>
//! ```
//!
//! The derived names used for Ranger entities are built here so that every
//! caller agrees on them.

use std::fmt;

use crate::errors::{FailedOperation, ProvisionResult};

/// Number of segments of a well-formed component id
const SEGMENTS: usize = 7;

/// Decomposed component identifier
///
/// # Examples
///
/// ```rust
/// use hdfs_provisioner::domain::ComponentIdentifier;
///
/// let id = ComponentIdentifier::decode("urn:dmb:cmp:healthcare:vaccinations:0:storage").unwrap();
/// assert_eq!(id.domain, "healthcare");
/// assert_eq!(id.zone_name(), "healthcare_vaccinations_0");
///
/// assert!(ComponentIdentifier::decode("wrong_id").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentIdentifier {
    pub domain: String,
    pub data_product_id: String,
    pub data_product_major_version: String,
    pub component_id: String,
}

impl ComponentIdentifier {
    /// Split a component id into its parts
    ///
    /// Trailing empty segments are dropped before counting, so `...:storage:`
    /// decodes like `...:storage` and `...:0:` lacks its component segment.
    /// Fails unless exactly seven segments remain.
    pub fn decode(id: &str) -> ProvisionResult<Self> {
        let mut segments: Vec<&str> = id.split(':').collect();
        while segments.last().is_some_and(|segment| segment.is_empty()) {
            segments.pop();
        }
        if segments.len() != SEGMENTS {
            return Err(FailedOperation::message(format!(
                "Component id '{}' is not in the expected shape, cannot extract attributes",
                id
            )));
        }

        Ok(Self {
            domain: segments[3].to_string(),
            data_product_id: segments[4].to_string(),
            data_product_major_version: segments[5].to_string(),
            component_id: segments[6].to_string(),
        })
    }

    /// `domain_dataProductId_majorVersion`, sanitized
    pub fn zone_name(&self) -> String {
        sanitize(&self.data_product_prefix())
    }

    /// Prefix of the owner role shared by every component of the data product
    pub fn owner_role_prefix(&self) -> String {
        self.data_product_prefix()
    }

    /// Prefix of the read-only role of this component
    pub fn user_role_prefix(&self) -> String {
        self.component_prefix()
    }

    /// Prefix of the access policy of this component
    pub fn policy_prefix(&self) -> String {
        self.component_prefix()
    }

    /// `<domain>/data-products/<dataProductId>/<majorVersion>/<componentId>`
    pub fn relative_folder(&self) -> String {
        format!(
            "{}/data-products/{}/{}/{}",
            self.domain, self.data_product_id, self.data_product_major_version, self.component_id
        )
    }

    fn data_product_prefix(&self) -> String {
        format!(
            "{}_{}_{}",
            self.domain, self.data_product_id, self.data_product_major_version
        )
    }

    fn component_prefix(&self) -> String {
        format!("{}_{}", self.data_product_prefix(), self.component_id)
    }
}

impl fmt::Display for ComponentIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "urn:dmb:cmp:{}:{}:{}:{}",
            self.domain, self.data_product_id, self.data_product_major_version, self.component_id
        )
    }
}

impl TryFrom<&str> for ComponentIdentifier {
    type Error = FailedOperation;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::decode(value)
    }
}

/// Replace every character outside `[A-Za-z0-9_]` with `_`
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}
