// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for hdfs-provisioner
//!
//! Provides deterministic descriptors, a directory and wiring helpers for
//! end-to-end tests against local mock servers.
//!
//! # Design Principles
//! - All test data is deterministic
//! - Fixtures are the ONLY place that builds descriptors and orchestrators
//! - HDFS and Ranger are local `mockito` servers; a request without a
//!   matching mock gets a 501 and fails the operation

#![allow(dead_code)]

use mockito::{Matcher, Mock, ServerGuard};
use std::sync::Arc;

use hdfs_provisioner::directory::StaticDirectory;
use hdfs_provisioner::domain::{ProvisionInfo, ProvisioningRequest, UpdateAclRequest};
use hdfs_provisioner::hdfs::WebHdfsGateway;
use hdfs_provisioner::principal::DirectoryPrincipalResolver;
use hdfs_provisioner::ranger::{RangerRestClient, RangerService};
use hdfs_provisioner::{HdfsConfig, ProvisionOrchestrator, RangerConfig};

pub const STORAGE_ID: &str = "urn:dmb:cmp:healthcare:vaccinations:0:storage";
pub const OUTPUT_PORT_ID: &str = "urn:dmb:cmp:healthcare:vaccinations:0:hdfs-output-port";

pub const STORAGE_PATH: &str = "myprefix/healthcare/data-products/vaccinations/0/storage";
pub const WEBHDFS_STORAGE_PATH: &str =
    "/webhdfs/v1/myprefix/healthcare/data-products/vaccinations/0/storage";

pub const DEPLOY_USER: &str = "deployer";
pub const HDFS_SERVICE: &str = "cm_hdfs";

pub const ZONE_NAME: &str = "healthcare_vaccinations_0";
pub const OWNER_ROLE: &str = "healthcare_vaccinations_0_owner";
pub const READ_ROLE: &str = "healthcare_vaccinations_0_storage_read";
pub const POLICY_NAME: &str = "healthcare_vaccinations_0_storage_access_policy";

pub const RANGER_API: &str = "/service/public/v2/api";

/// Directory knowing the owner, one consumer and two groups
pub const DIRECTORY: &str = r#"
users:
  - id: owner
    mail: owner@example.com
  - id: a
    mail: a@example.com
groups:
  - devs
  - g
"#;

const DESCRIPTOR: &str = r#"
dataProduct:
  id: urn:dmb:dp:healthcare:vaccinations:0
  name: Vaccinations
  domain: healthcare
  dataProductOwner: user:owner_example.com
  devGroup: devs
  components:
    - id: urn:dmb:cmp:healthcare:vaccinations:0:storage
      name: Storage
      kind: storage
      specific:
        prefixPath: myprefix
    - id: urn:dmb:cmp:healthcare:vaccinations:0:hdfs-output-port
      name: Output Port
      kind: outputport
      dependsOn:
        - urn:dmb:cmp:healthcare:vaccinations:0:storage
      specific: {}
componentIdToProvision: COMPONENT_ID
"#;

/// Descriptor of the vaccinations data product, provisioning `component_id`
pub fn descriptor(component_id: &str) -> String {
    DESCRIPTOR.replace("COMPONENT_ID", component_id)
}

pub fn provisioning_request(component_id: &str) -> ProvisioningRequest {
    ProvisioningRequest::component(descriptor(component_id), false)
}

pub fn update_acl_request(refs: &[&str]) -> UpdateAclRequest {
    UpdateAclRequest {
        refs: refs.iter().map(|r| r.to_string()).collect(),
        provision_info: ProvisionInfo {
            request: descriptor(OUTPUT_PORT_ID),
            result: String::new(),
        },
    }
}

pub fn ranger_config(ranger: &ServerGuard) -> RangerConfig {
    RangerConfig {
        base_url: ranger.url(),
        username: "admin".to_string(),
        password: "secret".to_string(),
        timeout_secs: 5,
        hdfs_service_name: HDFS_SERVICE.to_string(),
        owner_technical_user: DEPLOY_USER.to_string(),
    }
}

/// Orchestrator wired to real clients pointing at the mock servers
pub fn orchestrator(
    nn1: &ServerGuard,
    nn2: &ServerGuard,
    ranger: &ServerGuard,
) -> ProvisionOrchestrator {
    let directory =
        StaticDirectory::from_yaml_str(DIRECTORY).expect("Invalid directory fixture");
    let resolver = DirectoryPrincipalResolver::new(Arc::new(directory));

    let ranger_config = ranger_config(ranger);
    let engine = RangerService::new(
        RangerRestClient::new(&ranger_config).expect("Failed to build Ranger client"),
    );
    let filesystem = WebHdfsGateway::new(&HdfsConfig {
        base_url_nn1: nn1.url(),
        base_url_nn2: nn2.url(),
        timeout_secs: 5,
        user_name: None,
    })
    .expect("Failed to build WebHDFS client");

    ProvisionOrchestrator::new(
        Arc::new(resolver),
        Arc::new(engine),
        Arc::new(filesystem),
        &ranger_config,
    )
}

/// NameNode JMX status endpoint reporting `state`
pub async fn namenode_state(server: &mut ServerGuard, state: &str) -> Mock {
    server
        .mock("GET", "/jmx")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(r#"{{"beans":[{{"State":"{}"}}]}}"#, state))
        .create_async()
        .await
}

/// Ranger lookups that find no role and no policy
pub async fn ranger_without_roles_and_policies(ranger: &mut ServerGuard) -> Vec<Mock> {
    vec![
        ranger
            .mock("GET", format!("{}/roles", RANGER_API).as_str())
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await,
        ranger
            .mock("GET", format!("{}/policy", RANGER_API).as_str())
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await,
    ]
}
