// Copyright (c) 2025 - Cowboy AI, Inc.
//! Descriptors and provisioning requests

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::error;

use super::component::Component;
use crate::errors::{FailedOperation, Problem, ProvisionResult};

/// Kind of descriptor sent by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DescriptorKind {
    DataproductDescriptor,
    ComponentDescriptor,
    DataproductDescriptorWithResults,
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            DescriptorKind::DataproductDescriptor => "DATAPRODUCT_DESCRIPTOR",
            DescriptorKind::ComponentDescriptor => "COMPONENT_DESCRIPTOR",
            DescriptorKind::DataproductDescriptorWithResults => {
                "DATAPRODUCT_DESCRIPTOR_WITH_RESULTS"
            }
        };
        write!(f, "{}", tag)
    }
}

/// Inbound provisioning request, as received from the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningRequest {
    pub descriptor_kind: DescriptorKind,

    /// YAML document with `dataProduct` and `componentIdToProvision`
    pub descriptor: String,

    #[serde(default)]
    pub remove_data: bool,
}

impl ProvisioningRequest {
    pub fn component(descriptor: impl Into<String>, remove_data: bool) -> Self {
        Self {
            descriptor_kind: DescriptorKind::ComponentDescriptor,
            descriptor: descriptor.into(),
            remove_data,
        }
    }
}

/// Result of a previous provisioning, echoed back on ACL updates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionInfo {
    /// The descriptor originally provisioned
    pub request: String,

    #[serde(default)]
    pub result: String,
}

/// Request to grant access on a provisioned output port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAclRequest {
    /// Platform subjects (`user:<id>` / `group:<name>`) to grant access to
    pub refs: Vec<String>,
    pub provision_info: ProvisionInfo,
}

/// Data product owning the components
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataProduct {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub data_product_owner: String,
    #[serde(default)]
    pub dev_group: String,

    /// Raw component nodes, parsed on demand by kind
    #[serde(default)]
    pub components: Vec<serde_json::Value>,
}

impl DataProduct {
    /// Raw node of the component with the given id
    pub fn component(&self, id: &str) -> Option<&serde_json::Value> {
        self.components
            .iter()
            .find(|node| node.get("id").and_then(|v| v.as_str()) == Some(id))
    }

    /// Kind of the component with the given id
    pub fn component_kind(&self, id: &str) -> Option<&str> {
        self.component(id)
            .and_then(|node| node.get("kind"))
            .and_then(|kind| kind.as_str())
    }
}

/// Parsed descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    pub data_product: DataProduct,
    pub component_id_to_provision: String,
}

/// Validated request handed to the component handlers
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionRequest {
    pub data_product: DataProduct,
    pub component: Component,
    pub remove_data: bool,
}

/// Parse a YAML descriptor
pub fn parse_descriptor(yaml: &str) -> ProvisionResult<Descriptor> {
    serde_yaml::from_str(yaml).map_err(|e| {
        let message = format!("Failed to deserialize the Yaml Descriptor. Details: {}", e);
        error!("{}", message);
        FailedOperation::single(Problem::with_cause(message, &e))
    })
}

/// Parse a raw component node into a typed component
pub fn parse_component<T: DeserializeOwned>(node: &serde_json::Value) -> ProvisionResult<T> {
    T::deserialize(node).map_err(|e| {
        let message = format!("Failed to deserialize the component. Details: {}", e);
        error!("{}", message);
        FailedOperation::single(Problem::with_cause(message, &e))
    })
}
