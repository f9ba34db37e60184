// Copyright (c) 2025 - Cowboy AI, Inc.
//! Ranger Policy Engine
//!
//! [`PolicyEngine`] is the contract the reconciler works against. Lookups
//! return `Ok(None)` when the entity does not exist; any other failure is a
//! [`FailedOperation`] describing which entity could not be handled.
//!
//! [`RangerService`] implements it over any [`RangerApi`].

pub mod client;
pub mod entities;
pub mod model;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::errors::{FailedOperation, Problem, ProvisionResult};

pub use client::{RangerApi, RangerError, RangerRestClient};
pub use model::{RangerPolicy, RangerRole, RangerSecurityZone};

/// Policy engine contract
#[async_trait]
pub trait PolicyEngine: Send + Sync {
    async fn find_security_zone(&self, name: &str) -> ProvisionResult<Option<RangerSecurityZone>>;

    async fn create_security_zone(
        &self,
        zone: &RangerSecurityZone,
    ) -> ProvisionResult<RangerSecurityZone>;

    async fn update_security_zone(
        &self,
        zone: &RangerSecurityZone,
    ) -> ProvisionResult<RangerSecurityZone>;

    async fn find_policy(
        &self,
        service_name: &str,
        policy_name: &str,
        zone_name: Option<&str>,
    ) -> ProvisionResult<Option<RangerPolicy>>;

    async fn create_policy(&self, policy: &RangerPolicy) -> ProvisionResult<RangerPolicy>;

    async fn update_policy(&self, policy: &RangerPolicy) -> ProvisionResult<RangerPolicy>;

    async fn delete_policy(&self, policy: &RangerPolicy) -> ProvisionResult<()>;

    async fn find_role(&self, name: &str) -> ProvisionResult<Option<RangerRole>>;

    async fn create_role(&self, role: &RangerRole) -> ProvisionResult<RangerRole>;

    async fn update_role(&self, role: &RangerRole) -> ProvisionResult<RangerRole>;

    async fn delete_role(&self, role: &RangerRole) -> ProvisionResult<()>;
}

/// [`PolicyEngine`] backed by the Ranger API
pub struct RangerService<A> {
    api: A,
}

impl<A: RangerApi> RangerService<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }
}

/// `action` reads e.g. "creating the role"
fn ranger_failure(action: &str, name: &str, err: &RangerError) -> FailedOperation {
    let message = format!(
        "An error occurred while {} '{}' on Ranger. Please try again and if the error persists contact the platform team. Details: {}",
        action, name, err
    );
    error!("{}", message);
    FailedOperation::single(Problem::with_cause(message, err))
}

fn require_id(id: Option<i64>) -> Result<i64, RangerError> {
    id.ok_or_else(|| RangerError::transport("the entity has no id"))
}

/// Map "not found" statuses of a lookup to `None`
fn lookup<T>(result: Result<T, RangerError>) -> Result<Option<T>, RangerError> {
    match result {
        Ok(entity) => Ok(Some(entity)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

#[async_trait]
impl<A: RangerApi> PolicyEngine for RangerService<A> {
    async fn find_security_zone(&self, name: &str) -> ProvisionResult<Option<RangerSecurityZone>> {
        debug!("Searching for security zone {}", name);
        lookup(self.api.get_security_zone(name).await)
            .map_err(|e| ranger_failure("searching for security zone", name, &e))
    }

    async fn create_security_zone(
        &self,
        zone: &RangerSecurityZone,
    ) -> ProvisionResult<RangerSecurityZone> {
        debug!("Creating security zone {}", zone.name);
        self.api
            .create_security_zone(zone)
            .await
            .map_err(|e| ranger_failure("creating the security zone", &zone.name, &e))
    }

    async fn update_security_zone(
        &self,
        zone: &RangerSecurityZone,
    ) -> ProvisionResult<RangerSecurityZone> {
        debug!("Updating security zone {}", zone.name);
        let result = match require_id(zone.id) {
            Ok(id) => self.api.update_security_zone(id, zone).await,
            Err(e) => Err(e),
        };
        result.map_err(|e| ranger_failure("updating the security zone", &zone.name, &e))
    }

    async fn find_policy(
        &self,
        service_name: &str,
        policy_name: &str,
        zone_name: Option<&str>,
    ) -> ProvisionResult<Option<RangerPolicy>> {
        debug!("Searching for policy {}", policy_name);
        let mut filter = vec![("serviceName", service_name), ("policyName", policy_name)];
        if let Some(zone) = zone_name {
            filter.push(("zoneName", zone));
        }

        lookup(self.api.find_policies(&filter).await)
            .map(|found| found.and_then(|policies| policies.into_iter().next()))
            .map_err(|e| ranger_failure("searching for policy", policy_name, &e))
    }

    async fn create_policy(&self, policy: &RangerPolicy) -> ProvisionResult<RangerPolicy> {
        debug!("Creating policy {}", policy.name);
        self.api
            .create_policy(policy)
            .await
            .map_err(|e| ranger_failure("creating the policy", &policy.name, &e))
    }

    async fn update_policy(&self, policy: &RangerPolicy) -> ProvisionResult<RangerPolicy> {
        debug!("Updating policy {}", policy.name);
        let result = match require_id(policy.id) {
            Ok(id) => self.api.update_policy(id, policy).await,
            Err(e) => Err(e),
        };
        result.map_err(|e| ranger_failure("updating the policy", &policy.name, &e))
    }

    async fn delete_policy(&self, policy: &RangerPolicy) -> ProvisionResult<()> {
        debug!("Deleting policy {}", policy.name);
        let result = match require_id(policy.id) {
            Ok(id) => self.api.delete_policy(id).await,
            Err(e) => Err(e),
        };
        result.map_err(|e| ranger_failure("deleting the policy", &policy.name, &e))
    }

    async fn find_role(&self, name: &str) -> ProvisionResult<Option<RangerRole>> {
        debug!("Searching for role {}", name);
        lookup(self.api.find_roles(name).await)
            .map(|found| found.and_then(|roles| roles.into_iter().next()))
            .map_err(|e| ranger_failure("searching for role", name, &e))
    }

    async fn create_role(&self, role: &RangerRole) -> ProvisionResult<RangerRole> {
        debug!("Creating role {}", role.name);
        self.api
            .create_role(role)
            .await
            .map_err(|e| ranger_failure("creating the role", &role.name, &e))
    }

    async fn update_role(&self, role: &RangerRole) -> ProvisionResult<RangerRole> {
        debug!("Updating role {}", role.name);
        let result = match require_id(role.id) {
            Ok(id) => self.api.update_role(id, role).await,
            Err(e) => Err(e),
        };
        result.map_err(|e| ranger_failure("updating the role", &role.name, &e))
    }

    async fn delete_role(&self, role: &RangerRole) -> ProvisionResult<()> {
        debug!("Deleting role {}", role.name);
        let result = match require_id(role.id) {
            Ok(id) => self.api.delete_role(id).await,
            Err(e) => Err(e),
        };
        result.map_err(|e| ranger_failure("deleting the role", &role.name, &e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;

    use crate::config::RangerConfig;

    fn service(server: &ServerGuard) -> RangerService<RangerRestClient> {
        let config = RangerConfig {
            base_url: server.url(),
            ..RangerConfig::default()
        };
        RangerService::new(RangerRestClient::new(&config).unwrap())
    }

    #[tokio::test]
    async fn test_zone_not_found_is_none() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/service/public/v2/api/zones/name/zone")
            .with_status(400)
            .create_async()
            .await;

        let zone = service(&server).find_security_zone("zone").await.unwrap();
        assert!(zone.is_none());
    }

    #[tokio::test]
    async fn test_zone_lookup_failure_is_wrapped() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/service/public/v2/api/zones/name/zone")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let err = service(&server).find_security_zone("zone").await.unwrap_err();
        let description = &err.descriptions()[0];
        assert!(description.starts_with(
            "An error occurred while searching for security zone 'zone' on Ranger. Please try again and if the error persists contact the platform team. Details: "
        ));
        assert!(description.contains("boom"));
        assert!(err.problems()[0].cause.is_some());
    }

    #[tokio::test]
    async fn test_find_role_takes_first_result() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/service/public/v2/api/roles")
            .match_query(Matcher::UrlEncoded("roleName".into(), "dp_read".into()))
            .with_status(200)
            .with_body(json!([{"id": 1, "name": "dp_read"}, {"id": 2, "name": "dp_read"}]).to_string())
            .create_async()
            .await;

        let role = service(&server).find_role("dp_read").await.unwrap().unwrap();
        assert_eq!(role.id, Some(1));
    }

    #[tokio::test]
    async fn test_find_policy_empty_is_none() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/service/public/v2/api/policy")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let policy = service(&server)
            .find_policy("cm_hdfs", "p", Some("zone"))
            .await
            .unwrap();
        assert!(policy.is_none());
    }

    #[tokio::test]
    async fn test_update_without_id_fails() {
        let server = Server::new_async().await;
        let role = RangerRole {
            name: "dp_read".to_string(),
            ..RangerRole::default()
        };

        let err = service(&server).update_role(&role).await.unwrap_err();
        assert!(err.descriptions()[0]
            .starts_with("An error occurred while updating the role 'dp_read' on Ranger."));
    }

    #[tokio::test]
    async fn test_create_policy_failure_is_wrapped() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/service/public/v2/api/policy")
            .with_status(400)
            .with_body("duplicate")
            .create_async()
            .await;

        let policy = RangerPolicy {
            name: "p_access_policy".to_string(),
            ..RangerPolicy::default()
        };
        let err = service(&server).create_policy(&policy).await.unwrap_err();
        assert!(err.descriptions()[0]
            .starts_with("An error occurred while creating the policy 'p_access_policy' on Ranger."));
    }
}
