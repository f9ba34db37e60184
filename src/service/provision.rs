// Copyright (c) 2025 - Cowboy AI, Inc.
//! Provision Orchestrator
//!
//! Entry point of every provisioning operation. Each operation validates the
//! request first and dispatches on the component kind only once validation
//! succeeded:
//!
//! ```text
//! ProvisioningRequest ─→ validation ─→ Component::StorageArea → StorageAreaHandler
//!                                   └→ Component::OutputPort  → OutputPortHandler
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};

use super::output_port::OutputPortHandler;
use super::reconciler::AccessControlReconciler;
use super::storage_area::StorageAreaHandler;
use crate::config::RangerConfig;
use crate::domain::{Component, ProvisioningRequest, UpdateAclRequest};
use crate::errors::ProvisionResult;
use crate::hdfs::FilesystemGateway;
use crate::principal::PrincipalResolver;
use crate::ranger::PolicyEngine;
use crate::validation;

/// Outcome of a provisioning operation
///
/// Every operation runs to completion before answering; failures are
/// reported as a [`FailedOperation`](crate::errors::FailedOperation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Completed,
}

/// Information returned to the platform about a provisioned component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    /// Shown to every user of the platform
    pub public_info: Value,

    /// Kept by the platform, e.g. for later ACL updates
    pub private_info: Value,
}

/// Status of a completed operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningStatus {
    pub status: Status,
    pub result: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Info>,
}

impl ProvisioningStatus {
    pub fn completed() -> Self {
        Self {
            status: Status::Completed,
            result: String::new(),
            info: None,
        }
    }

    pub fn with_info(mut self, public_info: Value, private_info: Value) -> Self {
        self.info = Some(Info {
            public_info,
            private_info,
        });
        self
    }
}

/// Problems found by a validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub errors: Vec<String>,
}

/// Result of a validation, successful or not
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ValidationError>,
}

/// Provisioning operations offered to the platform
#[async_trait]
pub trait ProvisionService: Send + Sync {
    /// Validate a request without touching any external system
    fn validate(&self, request: &ProvisioningRequest) -> ValidationResult;

    /// Provision the component of a request
    async fn provision(
        &self,
        request: &ProvisioningRequest,
    ) -> ProvisionResult<ProvisioningStatus>;

    /// Unprovision the component of a request
    async fn unprovision(
        &self,
        request: &ProvisioningRequest,
    ) -> ProvisionResult<ProvisioningStatus>;

    /// Grant access on a provisioned component
    async fn update_acl(&self, request: &UpdateAclRequest) -> ProvisionResult<ProvisioningStatus>;
}

/// [`ProvisionService`] over HDFS and Ranger
pub struct ProvisionOrchestrator {
    storage_area: StorageAreaHandler,
    output_port: OutputPortHandler,
}

impl ProvisionOrchestrator {
    pub fn new(
        resolver: Arc<dyn PrincipalResolver>,
        engine: Arc<dyn PolicyEngine>,
        filesystem: Arc<dyn FilesystemGateway>,
        ranger: &RangerConfig,
    ) -> Self {
        let reconciler = Arc::new(AccessControlReconciler::new(
            engine,
            ranger.hdfs_service_name.clone(),
            ranger.owner_technical_user.clone(),
        ));

        Self {
            storage_area: StorageAreaHandler::new(
                resolver.clone(),
                reconciler.clone(),
                filesystem,
            ),
            output_port: OutputPortHandler::new(resolver, reconciler),
        }
    }
}

#[async_trait]
impl ProvisionService for ProvisionOrchestrator {
    fn validate(&self, request: &ProvisioningRequest) -> ValidationResult {
        match validation::validate(request) {
            Ok(_) => ValidationResult {
                valid: true,
                error: None,
            },
            Err(failure) => ValidationResult {
                valid: false,
                error: Some(ValidationError {
                    errors: failure.descriptions(),
                }),
            },
        }
    }

    async fn provision(
        &self,
        request: &ProvisioningRequest,
    ) -> ProvisionResult<ProvisioningStatus> {
        let request = validation::validate(request)?;

        match &request.component {
            Component::StorageArea(_) => {
                let path = self.storage_area.create(&request).await?;
                let private_info = json!({ "path": path });
                Ok(ProvisioningStatus::completed().with_info(json!({}), private_info))
            }
            Component::OutputPort(_) => {
                let path = self.output_port.create(&request).await?;
                let public_info = json!({
                    "path": {"type": "string", "label": "HDFS Path", "value": path}
                });
                Ok(ProvisioningStatus::completed().with_info(public_info, json!({})))
            }
        }
    }

    async fn unprovision(
        &self,
        request: &ProvisioningRequest,
    ) -> ProvisionResult<ProvisioningStatus> {
        let request = validation::validate(request)?;

        match &request.component {
            Component::StorageArea(_) => self.storage_area.destroy(&request).await?,
            Component::OutputPort(_) => self.output_port.destroy(&request).await?,
        }
        Ok(ProvisioningStatus::completed())
    }

    async fn update_acl(&self, request: &UpdateAclRequest) -> ProvisionResult<ProvisioningStatus> {
        info!("Starting updating Access Control Lists");

        // Reuse the component validation on the originally provisioned descriptor
        let provisioning =
            ProvisioningRequest::component(request.provision_info.request.clone(), false);
        let validated = validation::validate(&provisioning)?;

        match &validated.component {
            Component::StorageArea(storage) => {
                error!(
                    "Access control update requested on storage area {}",
                    storage.id
                );
                Err(self.storage_area.update_acl())
            }
            Component::OutputPort(_) => {
                self.output_port
                    .update_acl(&request.refs, &validated)
                    .await?;
                Ok(ProvisioningStatus::completed())
            }
        }
    }
}
