// Copyright (c) 2025 - Cowboy AI, Inc.
//! Output port handler
//!
//! An output port owns no remote entity. It exposes the folder of the
//! storage area it depends on and manages the membership of that storage
//! area's read role.

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{error, info};

use super::reconciler::AccessControlReconciler;
use crate::domain::{
    parse_component, partition_identities, Component, ComponentIdentifier, DataProduct,
    OutputPort, ProvisionRequest, StorageArea,
};
use crate::errors::{FailedOperation, ProvisionResult};
use crate::principal::{split_resolution, PrincipalResolver};

/// Provisions, destroys and grants access on output ports
pub struct OutputPortHandler {
    resolver: Arc<dyn PrincipalResolver>,
    reconciler: Arc<AccessControlReconciler>,
}

impl OutputPortHandler {
    pub fn new(
        resolver: Arc<dyn PrincipalResolver>,
        reconciler: Arc<AccessControlReconciler>,
    ) -> Self {
        Self {
            resolver,
            reconciler,
        }
    }

    /// Path of the storage area the output port depends on
    pub async fn create(&self, request: &ProvisionRequest) -> ProvisionResult<String> {
        let port = output_port(&request.component)?;
        let storage = dependency(&request.data_product, port)?;
        let id = ComponentIdentifier::decode(&storage.id)?;

        let path = storage.storage_specific()?.path(&id)?;
        info!("Output port {} exposes {}", port.id, path);
        Ok(path)
    }

    /// Remove every consumer from the read role of the dependency
    pub async fn destroy(&self, request: &ProvisionRequest) -> ProvisionResult<()> {
        let port = output_port(&request.component)?;
        let storage = dependency(&request.data_product, port)?;
        let id = ComponentIdentifier::decode(&storage.id)?;

        info!("Revoking consumer access of output port {}", port.id);
        self.reconciler.clear_user_role(&id).await
    }

    /// Grant read access to exactly the principals behind `refs`
    ///
    /// Unresolved subjects do not stop the others from being granted; their
    /// problems come first in the returned failure, followed by any problem
    /// of the role update.
    pub async fn update_acl(
        &self,
        refs: &[String],
        request: &ProvisionRequest,
    ) -> ProvisionResult<()> {
        let port = output_port(&request.component)?;
        let storage = dependency(&request.data_product, port)?;
        let id = ComponentIdentifier::decode(&storage.id)?;

        let subjects: BTreeSet<String> = refs.iter().cloned().collect();
        let (identities, resolution_failure) =
            split_resolution(self.resolver.resolve(&subjects).await);
        let (users, groups) = partition_identities(&identities);

        info!(
            "Granting output port {} to {} users and {} groups",
            port.id,
            users.len(),
            groups.len()
        );
        let upserted = self.reconciler.upsert_user_role(&id, &users, &groups).await;

        let failure = match (resolution_failure, upserted) {
            (None, Ok(_)) => return Ok(()),
            (Some(resolution), Ok(_)) => resolution,
            (None, Err(role)) => role,
            (Some(resolution), Err(role)) => resolution.merge(role),
        };
        error!("Access control update of {} failed: {}", port.id, failure);
        Err(failure)
    }
}

fn output_port(component: &Component) -> ProvisionResult<&OutputPort> {
    match component {
        Component::OutputPort(port) => Ok(port),
        Component::StorageArea(_) => {
            let message = "The component type is not of expected type OutputPort";
            error!("{}", message);
            Err(FailedOperation::message(message))
        }
    }
}

/// The storage area an output port depends on
fn dependency(dp: &DataProduct, port: &OutputPort) -> ProvisionResult<StorageArea> {
    let node = port
        .depends_on
        .first()
        .and_then(|storage_id| dp.component(storage_id))
        .ok_or_else(|| {
            let message = "The output port has not a corresponding dependent storage area";
            error!("{}", message);
            FailedOperation::message(message)
        })?;
    parse_component(node)
}
