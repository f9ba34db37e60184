// Copyright (c) 2025 - Cowboy AI, Inc.
//! Service Layer for HDFS Provisioning
//!
//! Coordinates validation, principal resolution, Ranger and HDFS.
//!
//! # Architecture
//!
//! ```text
//! ProvisioningRequest
//!     ↓
//! ProvisionOrchestrator (validation, dispatch on component kind)
//!     ↓
//! StorageAreaHandler / OutputPortHandler
//!     ↓
//! AccessControlReconciler ──→ PolicyEngine (Ranger)
//!     ↓
//! FilesystemGateway (WebHDFS)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use hdfs_provisioner::service::{ProvisionOrchestrator, ProvisionService};
//!
//! let orchestrator = ProvisionOrchestrator::new(resolver, engine, filesystem, &config.ranger);
//! let status = orchestrator.provision(&request).await?;
//! ```

pub mod output_port;
pub mod provision;
pub mod reconciler;
pub mod storage_area;

#[cfg(test)]
pub(crate) mod testing;

pub use output_port::OutputPortHandler;
pub use provision::{
    Info, ProvisionOrchestrator, ProvisionService, ProvisioningStatus, Status, ValidationError,
    ValidationResult,
};
pub use reconciler::{AccessControlReconciler, StorageAccess};
pub use storage_area::StorageAreaHandler;
