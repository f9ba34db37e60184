// Copyright (c) 2025 - Cowboy AI, Inc.
//! Storage area handler
//!
//! Provisioning a storage area:
//!
//! ```text
//! resolve owners (dataProductOwner, devGroup)
//!     ↓
//! compute folder path
//!     ↓
//! upsert zone, owner role, read role, policy   (Ranger lock held)
//!     ↓
//! create folder on HDFS
//! ```
//!
//! Any failure stops the sequence; nothing is rolled back. Every step is
//! idempotent so a retry converges.

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{error, info};

use super::reconciler::{AccessControlReconciler, StorageAccess};
use crate::domain::{
    partition_identities, Component, ComponentIdentifier, ProvisionRequest, StorageArea,
};
use crate::errors::{FailedOperation, ProvisionResult};
use crate::hdfs::FilesystemGateway;
use crate::principal::{split_resolution, PrincipalResolver};

const GROUP_PREFIX: &str = "group:";

/// Provisions and destroys storage areas
pub struct StorageAreaHandler {
    resolver: Arc<dyn PrincipalResolver>,
    reconciler: Arc<AccessControlReconciler>,
    filesystem: Arc<dyn FilesystemGateway>,
}

impl StorageAreaHandler {
    pub fn new(
        resolver: Arc<dyn PrincipalResolver>,
        reconciler: Arc<AccessControlReconciler>,
        filesystem: Arc<dyn FilesystemGateway>,
    ) -> Self {
        Self {
            resolver,
            reconciler,
            filesystem,
        }
    }

    /// Create the Ranger entities and the folder, returning the folder path
    pub async fn create(&self, request: &ProvisionRequest) -> ProvisionResult<String> {
        let storage = storage_area(&request.component)?;
        let id = ComponentIdentifier::decode(&storage.id)?;
        info!("Provisioning storage area {}", id);

        let (owner_users, owner_groups) = self.resolve_owners(request).await?;

        let specific = storage.storage_specific()?;
        let path = specific.path(&id)?;

        self.reconciler
            .upsert_storage_entities(StorageAccess {
                id: &id,
                zone_folder: specific.zone_folder(),
                path: &path,
                owner_users: &owner_users,
                owner_groups: &owner_groups,
            })
            .await?;

        let created = self.filesystem.create_folder(&path).await?;
        info!("Storage area {} provisioned at {}", id, created);
        Ok(created)
    }

    /// Delete the policy and read role; with `remove_data` also the folder
    pub async fn destroy(&self, request: &ProvisionRequest) -> ProvisionResult<()> {
        let storage = storage_area(&request.component)?;
        let id = ComponentIdentifier::decode(&storage.id)?;
        info!("Unprovisioning storage area {}", id);

        self.reconciler.delete_storage_entities(&id).await?;

        if request.remove_data {
            let path = storage.storage_specific()?.path(&id)?;
            info!("Removing data of {} at {}", id, path);
            self.filesystem.delete_folder(&path).await?;
        }

        Ok(())
    }

    /// Storage areas do not carry consumer ACLs
    pub fn update_acl(&self) -> FailedOperation {
        let message =
            "Updating Access Control Lists is not supported by the Storage Area Component";
        error!("{}", message);
        FailedOperation::message(message)
    }

    /// Owner principals as `(users, groups)`; every unresolved subject is reported
    async fn resolve_owners(
        &self,
        request: &ProvisionRequest,
    ) -> ProvisionResult<(Vec<String>, Vec<String>)> {
        let dp = &request.data_product;
        let subjects: BTreeSet<String> = [
            dp.data_product_owner.clone(),
            dev_group_subject(&dp.dev_group),
        ]
        .into_iter()
        .collect();

        let (identities, failure) = split_resolution(self.resolver.resolve(&subjects).await);
        if let Some(failure) = failure {
            error!("Unable to resolve the owners of the data product: {}", failure);
            return Err(failure);
        }

        Ok(partition_identities(&identities))
    }
}

/// `devs` → `group:devs`; already prefixed subjects are kept
fn dev_group_subject(dev_group: &str) -> String {
    if dev_group.starts_with(GROUP_PREFIX) {
        dev_group.to_string()
    } else {
        format!("{}{}", GROUP_PREFIX, dev_group)
    }
}

fn storage_area(component: &Component) -> ProvisionResult<&StorageArea> {
    match component {
        Component::StorageArea(storage) => Ok(storage),
        other => {
            let message = format!("The component {} is not of type StorageArea", other.id());
            error!("{}", message);
            Err(FailedOperation::message(message))
        }
    }
}
