// Copyright (c) 2025 - Cowboy AI, Inc.
//! HDFS provisioner for data product storage areas and output ports
//!
//! This crate provisions HDFS folders and the Apache Ranger security zones,
//! roles and access policies that guard them.

pub mod config;
pub mod directory;
pub mod domain;
pub mod errors;
pub mod hdfs;
pub mod principal;
pub mod ranger;
pub mod service;
pub mod validation;

// Re-export commonly used types
pub use config::{HdfsConfig, LdapConfig, ProvisionerConfig, RangerConfig};
pub use errors::{FailedOperation, Problem, ProvisionResult, ProvisionerError, ProvisionerResult};
pub use service::{ProvisionOrchestrator, ProvisionService, ProvisioningStatus, ValidationResult};
