// Copyright (c) 2025 - Cowboy AI, Inc.
//! Ranger REST client
//!
//! Thin wrapper over the Ranger public v2 API:
//!
//! ```text
//! GET    /service/public/v2/api/zones/name/{name}
//! POST   /service/public/v2/api/zones
//! PUT    /service/public/v2/api/zones/{id}
//! GET    /service/public/v2/api/policy?serviceName=..&policyName=..&zoneName=..
//! POST   /service/public/v2/api/policy
//! PUT    /service/public/v2/api/policy/{id}
//! DELETE /service/public/v2/api/policy/{id}
//! GET    /service/public/v2/api/roles?roleName=..
//! POST   /service/public/v2/api/roles
//! PUT    /service/public/v2/api/roles/{id}
//! DELETE /service/public/v2/api/roles/{id}
//! ```

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use super::model::{RangerPolicy, RangerRole, RangerSecurityZone};
use crate::config::RangerConfig;
use crate::errors::{ProvisionerError, ProvisionerResult};

const API_PREFIX: &str = "/service/public/v2/api";

/// Failure of a Ranger call, with the HTTP status when one was received
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RangerError {
    pub status: Option<u16>,
    pub message: String,
}

impl RangerError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// 400 and 404 both mean the entity does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self.status, Some(400) | Some(404))
    }
}

/// Raw Ranger API contract
#[async_trait]
pub trait RangerApi: Send + Sync {
    async fn get_security_zone(&self, name: &str) -> Result<RangerSecurityZone, RangerError>;

    async fn create_security_zone(
        &self,
        zone: &RangerSecurityZone,
    ) -> Result<RangerSecurityZone, RangerError>;

    async fn update_security_zone(
        &self,
        id: i64,
        zone: &RangerSecurityZone,
    ) -> Result<RangerSecurityZone, RangerError>;

    async fn find_policies(
        &self,
        filter: &[(&str, &str)],
    ) -> Result<Vec<RangerPolicy>, RangerError>;

    async fn create_policy(&self, policy: &RangerPolicy) -> Result<RangerPolicy, RangerError>;

    async fn update_policy(
        &self,
        id: i64,
        policy: &RangerPolicy,
    ) -> Result<RangerPolicy, RangerError>;

    async fn delete_policy(&self, id: i64) -> Result<(), RangerError>;

    async fn find_roles(&self, role_name: &str) -> Result<Vec<RangerRole>, RangerError>;

    async fn create_role(&self, role: &RangerRole) -> Result<RangerRole, RangerError>;

    async fn update_role(&self, id: i64, role: &RangerRole) -> Result<RangerRole, RangerError>;

    async fn delete_role(&self, id: i64) -> Result<(), RangerError>;
}

/// reqwest-based [`RangerApi`] with basic authentication
#[derive(Debug, Clone)]
pub struct RangerRestClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl RangerRestClient {
    pub fn new(config: &RangerConfig) -> ProvisionerResult<Self> {
        info!("Connecting to Ranger at {}", config.base_url);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                ProvisionerError::HttpClient(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = format!("{}{}{}", self.base_url, API_PREFIX, endpoint);
        debug!("Ranger {} {}", method, url);
        self.client
            .request(method, url)
            .basic_auth(&self.username, Some(&self.password))
            .header("Accept", "application/json")
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, RangerError> {
        let response = send(request).await?;
        response
            .json()
            .await
            .map_err(|e| RangerError::transport(format!("Invalid Ranger response: {}", e)))
    }

    async fn execute_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
    ) -> Result<T, RangerError> {
        self.execute(self.request(method, endpoint).json(body)).await
    }

    async fn delete(&self, endpoint: &str) -> Result<(), RangerError> {
        send(self.request(Method::DELETE, endpoint)).await.map(|_| ())
    }
}

async fn send(request: RequestBuilder) -> Result<reqwest::Response, RangerError> {
    let response = request
        .send()
        .await
        .map_err(|e| RangerError::transport(e.to_string()))?;

    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(RangerError::status(
            status.as_u16(),
            format!("Ranger returned {}: {}", status, body),
        ))
    }
}

#[async_trait]
impl RangerApi for RangerRestClient {
    async fn get_security_zone(&self, name: &str) -> Result<RangerSecurityZone, RangerError> {
        let endpoint = format!("/zones/name/{}", urlencoding::encode(name));
        self.execute(self.request(Method::GET, &endpoint)).await
    }

    async fn create_security_zone(
        &self,
        zone: &RangerSecurityZone,
    ) -> Result<RangerSecurityZone, RangerError> {
        self.execute_json(Method::POST, "/zones", zone).await
    }

    async fn update_security_zone(
        &self,
        id: i64,
        zone: &RangerSecurityZone,
    ) -> Result<RangerSecurityZone, RangerError> {
        self.execute_json(Method::PUT, &format!("/zones/{}", id), zone)
            .await
    }

    async fn find_policies(
        &self,
        filter: &[(&str, &str)],
    ) -> Result<Vec<RangerPolicy>, RangerError> {
        self.execute(self.request(Method::GET, "/policy").query(filter))
            .await
    }

    async fn create_policy(&self, policy: &RangerPolicy) -> Result<RangerPolicy, RangerError> {
        self.execute_json(Method::POST, "/policy", policy).await
    }

    async fn update_policy(
        &self,
        id: i64,
        policy: &RangerPolicy,
    ) -> Result<RangerPolicy, RangerError> {
        self.execute_json(Method::PUT, &format!("/policy/{}", id), policy)
            .await
    }

    async fn delete_policy(&self, id: i64) -> Result<(), RangerError> {
        self.delete(&format!("/policy/{}", id)).await
    }

    async fn find_roles(&self, role_name: &str) -> Result<Vec<RangerRole>, RangerError> {
        self.execute(
            self.request(Method::GET, "/roles")
                .query(&[("roleName", role_name)]),
        )
        .await
    }

    async fn create_role(&self, role: &RangerRole) -> Result<RangerRole, RangerError> {
        self.execute_json(Method::POST, "/roles", role).await
    }

    async fn update_role(&self, id: i64, role: &RangerRole) -> Result<RangerRole, RangerError> {
        self.execute_json(Method::PUT, &format!("/roles/{}", id), role)
            .await
    }

    async fn delete_role(&self, id: i64) -> Result<(), RangerError> {
        self.delete(&format!("/roles/{}", id)).await
    }
}
