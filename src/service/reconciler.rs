// Copyright (c) 2025 - Cowboy AI, Inc.
//! Access-Control Reconciler
//!
//! Brings the Ranger entities of a storage area to the desired state:
//!
//! ```text
//! zone    <domain>_<dp>_<version>                   paths ∪ {zone folder}
//! role    <domain>_<dp>_<version>_owner             owners (+ admins kept)
//! role    <domain>_<dp>_<version>_<component>_read  consumers (+ admins kept)
//! policy  <domain>_<dp>_<version>_<component>_access_policy
//!         owner role READ+WRITE, read role READ on <path>*
//! ```
//!
//! Every upsert reads the current remote entity before writing it.
//!
//! # Concurrency
//!
//! Ranger rejects concurrent writes to the same entity. All mutations go
//! through a single process-wide lock, so two provisioning calls never
//! interleave their Ranger writes, whichever data product they target.

use std::sync::{Arc, OnceLock};
use tokio::sync::{Mutex, MutexGuard};
use tracing::info;

use crate::domain::ComponentIdentifier;
use crate::errors::ProvisionResult;
use crate::ranger::entities::{
    merge_policy, merge_role, merge_security_zone, new_policy, new_role, new_security_zone,
    owner_role_name, policy_folder_path, policy_name, user_role_name,
};
use crate::ranger::{PolicyEngine, RangerRole};

static RANGER_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

async fn ranger_lock() -> MutexGuard<'static, ()> {
    RANGER_LOCK.get_or_init(|| Mutex::new(())).lock().await
}

/// Desired access control of a storage area
#[derive(Debug, Clone)]
pub struct StorageAccess<'a> {
    pub id: &'a ComponentIdentifier,
    /// Path registered in the security zone
    pub zone_folder: &'a str,
    /// Folder of the storage area
    pub path: &'a str,
    pub owner_users: &'a [String],
    pub owner_groups: &'a [String],
}

/// Reconciles zones, roles and policies on the policy engine
pub struct AccessControlReconciler {
    engine: Arc<dyn PolicyEngine>,
    hdfs_service_name: String,
    deploy_user: String,
}

impl AccessControlReconciler {
    pub fn new(
        engine: Arc<dyn PolicyEngine>,
        hdfs_service_name: impl Into<String>,
        deploy_user: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            hdfs_service_name: hdfs_service_name.into(),
            deploy_user: deploy_user.into(),
        }
    }

    /// Create or update the zone, both roles and the policy of a storage area
    pub async fn upsert_storage_entities(&self, access: StorageAccess<'_>) -> ProvisionResult<()> {
        let id = access.id;
        let zone_name = id.zone_name();
        let owner_role = owner_role_name(&id.owner_role_prefix());
        let user_role = user_role_name(&id.user_role_prefix());

        let _guard = ranger_lock().await;
        info!("Upserting Ranger entities of {}", id);

        self.upsert_security_zone(&zone_name, access.zone_folder)
            .await?;
        self.upsert_role(&owner_role, access.owner_users, access.owner_groups)
            .await?;
        self.upsert_role(&user_role, &[], &[]).await?;
        self.upsert_policy(id, &zone_name, access.path, &owner_role, &user_role)
            .await?;

        info!("Ranger entities of {} are up to date", id);
        Ok(())
    }

    /// Delete the policy and the read role of a storage area
    ///
    /// Entities that are already gone are skipped. The zone and the owner
    /// role are shared by the whole data product and stay.
    pub async fn delete_storage_entities(&self, id: &ComponentIdentifier) -> ProvisionResult<()> {
        let zone_name = id.zone_name();
        let policy = policy_name(&id.policy_prefix());
        let user_role = user_role_name(&id.user_role_prefix());

        let _guard = ranger_lock().await;
        info!("Deleting Ranger entities of {}", id);

        if let Some(existing) = self
            .engine
            .find_policy(&self.hdfs_service_name, &policy, Some(&zone_name))
            .await?
        {
            self.engine.delete_policy(&existing).await?;
        }

        if let Some(existing) = self.engine.find_role(&user_role).await? {
            self.engine.delete_role(&existing).await?;
        }

        Ok(())
    }

    /// Remove every regular member from the read role of a storage area
    ///
    /// A missing role is not an error.
    pub async fn clear_user_role(&self, storage_id: &ComponentIdentifier) -> ProvisionResult<()> {
        let user_role = user_role_name(&storage_id.user_role_prefix());

        let _guard = ranger_lock().await;
        match self.engine.find_role(&user_role).await? {
            Some(existing) => {
                info!("Clearing members of role {}", user_role);
                self.engine
                    .update_role(&merge_role(existing, &[], &[]))
                    .await?;
            }
            None => info!("Role {} does not exist, nothing to clear", user_role),
        }
        Ok(())
    }

    /// Set the regular members of the read role of a storage area
    pub async fn upsert_user_role(
        &self,
        storage_id: &ComponentIdentifier,
        users: &[String],
        groups: &[String],
    ) -> ProvisionResult<RangerRole> {
        let user_role = user_role_name(&storage_id.user_role_prefix());

        let _guard = ranger_lock().await;
        self.upsert_role(&user_role, users, groups).await
    }

    async fn upsert_security_zone(&self, zone_name: &str, zone_folder: &str) -> ProvisionResult<()> {
        match self.engine.find_security_zone(zone_name).await? {
            Some(existing) => {
                info!("Updating security zone {}", zone_name);
                let zone = merge_security_zone(existing, &self.hdfs_service_name, zone_folder);
                self.engine.update_security_zone(&zone).await?;
            }
            None => {
                info!("Creating security zone {}", zone_name);
                let zone = new_security_zone(
                    zone_name,
                    &self.hdfs_service_name,
                    &self.deploy_user,
                    zone_folder,
                );
                self.engine.create_security_zone(&zone).await?;
            }
        }
        Ok(())
    }

    /// Caller must hold the Ranger lock
    async fn upsert_role(
        &self,
        name: &str,
        users: &[String],
        groups: &[String],
    ) -> ProvisionResult<RangerRole> {
        match self.engine.find_role(name).await? {
            Some(existing) => {
                info!("Updating role {}", name);
                self.engine
                    .update_role(&merge_role(existing, users, groups))
                    .await
            }
            None => {
                info!("Creating role {}", name);
                self.engine
                    .create_role(&new_role(name, users, groups, &self.deploy_user))
                    .await
            }
        }
    }

    async fn upsert_policy(
        &self,
        id: &ComponentIdentifier,
        zone_name: &str,
        path: &str,
        owner_role: &str,
        user_role: &str,
    ) -> ProvisionResult<()> {
        let prefix = id.policy_prefix();
        let name = policy_name(&prefix);
        let folder = policy_folder_path(path);
        let service = &self.hdfs_service_name;

        match self
            .engine
            .find_policy(service, &name, Some(zone_name))
            .await?
        {
            Some(existing) => {
                info!("Updating policy {}", name);
                let policy = merge_policy(
                    existing, &prefix, zone_name, &folder, owner_role, user_role, service,
                );
                self.engine.update_policy(&policy).await?;
            }
            None => {
                info!("Creating policy {}", name);
                let policy = new_policy(&prefix, zone_name, &folder, owner_role, user_role, service);
                self.engine.create_policy(&policy).await?;
            }
        }
        Ok(())
    }
}
