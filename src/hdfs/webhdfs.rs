// Copyright (c) 2025 - Cowboy AI, Inc.
//! WebHDFS Filesystem Gateway
//!
//! ```text
//! create_folder(p) = PUT    {active}/webhdfs/v1{p}?op=MKDIRS
//! delete_folder(p) = DELETE {active}/webhdfs/v1{p}?op=DELETE&recursive=true
//! ```
//!
//! Both respond with `{"boolean": <outcome>}`.

use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info};

use super::namenode::ActiveNodeLocator;
use super::FilesystemGateway;
use crate::config::HdfsConfig;
use crate::errors::{FailedOperation, Problem, ProvisionResult, ProvisionerError, ProvisionerResult};

#[derive(Debug, Deserialize)]
struct HdfsResult {
    #[serde(rename = "boolean", default)]
    outcome: bool,
}

/// Gateway issuing WebHDFS calls against the active NameNode
#[derive(Debug, Clone)]
pub struct WebHdfsGateway {
    client: Client,
    locator: ActiveNodeLocator,
    user_name: Option<String>,
}

impl WebHdfsGateway {
    /// Create a gateway for the configured NameNode pair
    pub fn new(config: &HdfsConfig) -> ProvisionerResult<Self> {
        info!(
            "Using NameNodes at {} and {}",
            config.base_url_nn1, config.base_url_nn2
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                ProvisionerError::HttpClient(format!("Failed to create HTTP client: {}", e))
            })?;

        let locator = ActiveNodeLocator::new(
            client.clone(),
            config.base_url_nn1.clone(),
            config.base_url_nn2.clone(),
        );

        Ok(Self {
            client,
            locator,
            user_name: config.user_name.clone(),
        })
    }

    fn url(&self, base_url: &str, path: &str, query: &str) -> String {
        let mut url = format!(
            "{}/webhdfs/v1{}?{}",
            base_url.trim_end_matches('/'),
            encode_path(path),
            query
        );
        if let Some(user) = &self.user_name {
            url.push_str("&user.name=");
            url.push_str(&urlencoding::encode(user));
        }
        url
    }

    async fn call(
        &self,
        method: Method,
        operation: &str,
        path: &str,
        query: &str,
    ) -> ProvisionResult<HdfsResult> {
        let base_url = self.locator.locate_active().await?;
        let url = self.url(&base_url, path, query);
        debug!("{} {}", method, url);

        let response = self
            .client
            .request(method, &url)
            .send()
            .await
            .map_err(|e| failure(operation, path, Some(&e)))?;

        parse(response, operation, path).await
    }
}

async fn parse(response: Response, operation: &str, path: &str) -> ProvisionResult<HdfsResult> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = failed_message(operation, path, Some(&format!("{} {}", status, body)));
        error!("{}", message);
        return Err(FailedOperation::single(Problem {
            description: message,
            cause: Some(status.to_string()),
        }));
    }

    response
        .json::<HdfsResult>()
        .await
        .map_err(|e| failure(operation, path, Some(&e)))
}

#[async_trait]
impl FilesystemGateway for WebHdfsGateway {
    async fn create_folder(&self, path: &str) -> ProvisionResult<String> {
        info!("Creating folder {}", path);
        let result = self.call(Method::PUT, "create", path, "op=MKDIRS").await?;
        if result.outcome {
            Ok(path.to_string())
        } else {
            Err(failure::<reqwest::Error>("create", path, None))
        }
    }

    async fn delete_folder(&self, path: &str) -> ProvisionResult<String> {
        info!("Deleting folder {}", path);
        // A `false` outcome means the folder was already absent.
        self.call(Method::DELETE, "delete", path, "op=DELETE&recursive=true")
            .await?;
        Ok(path.to_string())
    }
}

/// Percent-encode each segment, ensuring a leading `/`
fn encode_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| format!("/{}", urlencoding::encode(segment)))
        .collect()
}

fn failed_message(operation: &str, path: &str, details: Option<&str>) -> String {
    match details {
        Some(details) => format!(
            "Failed to {} the folder '{}'. Please try again and if the issue persists contact the platform team. Details: {}",
            operation, path, details
        ),
        None => format!(
            "Failed to {} the folder '{}'. Please try again and if the issue persists contact the platform team",
            operation, path
        ),
    }
}

fn failure<E: std::error::Error>(operation: &str, path: &str, cause: Option<&E>) -> FailedOperation {
    let problem = match cause {
        Some(e) => Problem::with_cause(failed_message(operation, path, Some(&e.to_string())), e),
        None => Problem::new(failed_message(operation, path, None)),
    };
    error!("{}", problem);
    FailedOperation::single(problem)
}
