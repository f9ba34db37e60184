// Copyright (c) 2025 - Cowboy AI, Inc.
//! Provisioning Domain Models
//!
//! Core domain concepts for provisioning data product components on HDFS.
//!
//! # Value Objects
//!
//! - [`ComponentIdentifier`] - Decomposed 7-segment component URN
//! - [`StorageSpecific`] - Folder layout of a storage area
//! - [`CdpIdentity`] - User or group resolved from the directory
//!
//! # Components
//!
//! - [`Component`] - Closed set of provisionable kinds ([`StorageArea`], [`OutputPort`])
//!
//! # Requests
//!
//! - [`ProvisioningRequest`] - Raw request carrying a YAML descriptor
//! - [`ProvisionRequest`] - Validated request consumed by the handlers
//! - [`UpdateAclRequest`] - Access grant on a provisioned output port

pub mod component;
pub mod descriptor;
pub mod identifier;
pub mod identity;

pub use component::{
    join_path, Component, ComponentHeader, OutputPort, StorageArea, StorageSpecific,
    OUTPUTPORT_KIND, STORAGE_KIND,
};
pub use descriptor::{
    parse_component, parse_descriptor, DataProduct, Descriptor, DescriptorKind, ProvisionInfo,
    ProvisionRequest, ProvisioningRequest, UpdateAclRequest,
};
pub use identifier::{sanitize, ComponentIdentifier};
pub use identity::{partition_identities, CdpIdentity};
