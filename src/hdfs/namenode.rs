// Copyright (c) 2025 - Cowboy AI, Inc.
//! Active NameNode discovery
//!
//! Each NameNode exposes its HA state over JMX:
//!
//! ```text
//! GET {base}/jmx?qry=Hadoop:service=NameNode,name=NameNodeStatus
//! {"beans": [{"State": "active", ...}]}
//! ```
//!
//! The active node is looked up again on every filesystem operation, since
//! active and standby roles can flip between calls.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::errors::{FailedOperation, Problem, ProvisionResult};

const JMX_STATUS_PATH: &str = "/jmx?qry=Hadoop:service=NameNode,name=NameNodeStatus";

const NO_ACTIVE_NODE: &str =
    "Unable to find an active NameNode. Please try again and if the issue persists contact the platform team.";

const STATUS_FAILED: &str = "Failed to retrieve the current active NameNode. Please try again and if the issue persists contact the platform team. Details: ";

#[derive(Debug, Deserialize)]
struct JmxResponse {
    #[serde(default)]
    beans: Vec<JmxBean>,
}

#[derive(Debug, Deserialize)]
struct JmxBean {
    #[serde(rename = "State", default)]
    state: Option<String>,
}

impl JmxResponse {
    fn is_active(&self) -> bool {
        self.beans.iter().any(|bean| {
            bean.state
                .as_deref()
                .is_some_and(|state| state.eq_ignore_ascii_case("active"))
        })
    }
}

/// Locates the active node among two redundant NameNodes
#[derive(Debug, Clone)]
pub struct ActiveNodeLocator {
    client: Client,
    base_url_nn1: String,
    base_url_nn2: String,
}

impl ActiveNodeLocator {
    pub fn new(client: Client, base_url_nn1: String, base_url_nn2: String) -> Self {
        Self {
            client,
            base_url_nn1,
            base_url_nn2,
        }
    }

    /// Base URL of the active NameNode
    ///
    /// NN1 is asked first; NN2 only when NN1 is not active. A failed status
    /// query counts as "not active". When no node is active, every query
    /// failure is reported ahead of the "no active NameNode" problem.
    pub async fn locate_active(&self) -> ProvisionResult<String> {
        let mut failures = Vec::new();

        for (label, base_url) in [("NN1", &self.base_url_nn1), ("NN2", &self.base_url_nn2)] {
            info!("Checking if {} is active", label);
            match self.query_active(base_url).await {
                Ok(true) => {
                    debug!("{} at {} is active", label, base_url);
                    return Ok(base_url.clone());
                }
                Ok(false) => debug!("{} at {} is not active", label, base_url),
                Err(problem) => {
                    warn!("Status query of {} at {} failed: {}", label, base_url, problem);
                    failures.push(problem);
                }
            }
        }

        failures.push(Problem::new(NO_ACTIVE_NODE));
        let failed = FailedOperation::new(failures);
        error!("{}", failed);
        Err(failed)
    }

    async fn query_active(&self, base_url: &str) -> Result<bool, Problem> {
        let url = format!("{}{}", base_url.trim_end_matches('/'), JMX_STATUS_PATH);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Problem::with_cause(format!("{}{}", STATUS_FAILED, e), &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Problem {
                description: format!("{}HTTP {}", STATUS_FAILED, status),
                cause: Some(status.to_string()),
            });
        }

        let jmx: JmxResponse = response
            .json()
            .await
            .map_err(|e| Problem::with_cause(format!("{}{}", STATUS_FAILED, e), &e))?;

        Ok(jmx.is_active())
    }
}
