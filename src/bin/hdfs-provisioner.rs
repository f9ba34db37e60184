// Copyright (c) 2025 - Cowboy AI, Inc.
//! HDFS Provisioner CLI
//!
//! Runs one provisioning operation on a component descriptor and prints the
//! resulting status as JSON.
//!
//! Run with: cargo run --bin hdfs-provisioner -- provision descriptor.yaml
//!
//! Prerequisites:
//! 1. Both NameNodes reachable (HDFS_BASE_URL_NN1, HDFS_BASE_URL_NN2)
//! 2. Ranger admin reachable (RANGER_BASE_URL, RANGER_USERNAME, RANGER_PASSWORD)
//! 3. A directory to resolve users and groups: an LDAP server (LDAP_URL,
//!    LDAP_SEARCH_BASE_DN, ...) or a file listing them (DIRECTORY_FILE)

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use hdfs_provisioner::{
    directory::{DirectoryLookup, LdapDirectory, StaticDirectory},
    domain::{ProvisionInfo, ProvisioningRequest, UpdateAclRequest},
    hdfs::WebHdfsGateway,
    principal::DirectoryPrincipalResolver,
    ranger::{RangerRestClient, RangerService},
    FailedOperation, HdfsConfig, ProvisionOrchestrator, ProvisionService, ProvisionerConfig,
    LdapConfig, RangerConfig,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(
    name = "hdfs-provisioner",
    about = "Provision HDFS storage areas and output ports guarded by Ranger"
)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ConnectionArgs {
    /// Base URL of the first NameNode
    #[arg(long, env = "HDFS_BASE_URL_NN1")]
    hdfs_base_url_nn1: String,

    /// Base URL of the second NameNode
    #[arg(long, env = "HDFS_BASE_URL_NN2")]
    hdfs_base_url_nn2: String,

    /// WebHDFS user.name
    #[arg(long, env = "HDFS_USER_NAME")]
    hdfs_user_name: Option<String>,

    /// Ranger admin base URL
    #[arg(long, env = "RANGER_BASE_URL")]
    ranger_base_url: String,

    #[arg(long, env = "RANGER_USERNAME")]
    ranger_username: String,

    #[arg(long, env = "RANGER_PASSWORD", default_value = "", hide_env_values = true)]
    ranger_password: String,

    /// HDFS service registered in Ranger
    #[arg(long, env = "RANGER_HDFS_SERVICE_NAME", default_value = "cm_hdfs")]
    ranger_hdfs_service_name: String,

    /// Technical user administering zones and roles
    #[arg(long, env = "RANGER_OWNER_TECHNICAL_USER")]
    ranger_owner_technical_user: String,

    /// Request timeout in seconds, for HDFS and Ranger
    #[arg(long, env = "PROVISIONER_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// YAML file listing the directory users and groups, used without LDAP
    #[arg(long, env = "DIRECTORY_FILE")]
    directory_file: Option<PathBuf>,

    #[command(flatten)]
    ldap: LdapArgs,
}

#[derive(Args)]
struct LdapArgs {
    /// LDAP server resolving users and groups
    #[arg(long, env = "LDAP_URL")]
    ldap_url: Option<String>,

    /// Upgrade the LDAP connection with StartTLS
    #[arg(long, env = "LDAP_USE_TLS")]
    ldap_use_tls: bool,

    #[arg(long, env = "LDAP_BIND_USERNAME", default_value = "")]
    ldap_bind_username: String,

    #[arg(long, env = "LDAP_BIND_PASSWORD", default_value = "", hide_env_values = true)]
    ldap_bind_password: String,

    #[arg(long, env = "LDAP_SEARCH_BASE_DN", default_value = "")]
    ldap_search_base_dn: String,

    /// User filter; `{mail}` is replaced with the mail address
    #[arg(long, env = "LDAP_USER_SEARCH_FILTER", default_value = "(mail={mail})")]
    ldap_user_search_filter: String,

    /// Group filter; `{group}` is replaced with the group name
    #[arg(
        long,
        env = "LDAP_GROUP_SEARCH_FILTER",
        default_value = "(&(objectClass=groupOfNames)(cn={group}))"
    )]
    ldap_group_search_filter: String,

    #[arg(long, env = "LDAP_USER_ATTRIBUTE_NAME", default_value = "cn")]
    ldap_user_attribute_name: String,

    #[arg(long, env = "LDAP_GROUP_ATTRIBUTE_NAME", default_value = "cn")]
    ldap_group_attribute_name: String,
}

impl LdapArgs {
    fn config(&self, timeout_secs: u64) -> Option<LdapConfig> {
        self.ldap_url.as_ref().map(|url| LdapConfig {
            url: url.clone(),
            use_tls: self.ldap_use_tls,
            timeout_secs,
            bind_username: self.ldap_bind_username.clone(),
            bind_password: self.ldap_bind_password.clone(),
            search_base_dn: self.ldap_search_base_dn.clone(),
            user_search_filter: self.ldap_user_search_filter.clone(),
            group_search_filter: self.ldap_group_search_filter.clone(),
            user_attribute_name: self.ldap_user_attribute_name.clone(),
            group_attribute_name: self.ldap_group_attribute_name.clone(),
        })
    }
}

impl ConnectionArgs {
    fn config(&self) -> ProvisionerConfig {
        ProvisionerConfig {
            hdfs: HdfsConfig {
                base_url_nn1: self.hdfs_base_url_nn1.clone(),
                base_url_nn2: self.hdfs_base_url_nn2.clone(),
                timeout_secs: self.timeout_secs,
                user_name: self.hdfs_user_name.clone(),
            },
            ranger: RangerConfig {
                base_url: self.ranger_base_url.clone(),
                username: self.ranger_username.clone(),
                password: self.ranger_password.clone(),
                timeout_secs: self.timeout_secs,
                hdfs_service_name: self.ranger_hdfs_service_name.clone(),
                owner_technical_user: self.ranger_owner_technical_user.clone(),
            },
            ldap: self.ldap.config(self.timeout_secs),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Validate a component descriptor without touching HDFS or Ranger.
    Validate {
        /// Component descriptor (YAML)
        descriptor: PathBuf,
    },

    /// Provision the component of a descriptor.
    Provision {
        descriptor: PathBuf,
    },

    /// Unprovision the component of a descriptor.
    Unprovision {
        descriptor: PathBuf,

        /// Also delete the storage area folder
        #[arg(long)]
        remove_data: bool,
    },

    /// Grant read access on a provisioned output port.
    UpdateAcl {
        /// Descriptor the output port was provisioned with
        descriptor: PathBuf,

        /// Subject to grant access to (`user:<id>` or `group:<name>`)
        #[arg(long = "ref", required = true)]
        refs: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let config = cli.connection.config();
    config.validate().context("Invalid configuration")?;
    info!("Configuration loaded:");
    info!(
        "  - NameNodes: {}, {}",
        config.hdfs.base_url_nn1, config.hdfs.base_url_nn2
    );
    info!("  - Ranger URL: {}", config.ranger.base_url);
    info!("  - HDFS service: {}", config.ranger.hdfs_service_name);
    if let Some(ldap) = &config.ldap {
        info!("  - LDAP URL: {}", ldap.url);
    }

    let orchestrator = build_orchestrator(&config, cli.connection.directory_file.as_deref())?;

    let outcome = match &cli.command {
        Command::Validate { descriptor } => {
            let request = ProvisioningRequest::component(read_descriptor(descriptor)?, false);
            let result = orchestrator.validate(&request);
            print_json(&result)?;
            return Ok(if result.valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            });
        }
        Command::Provision { descriptor } => {
            let request = ProvisioningRequest::component(read_descriptor(descriptor)?, false);
            orchestrator.provision(&request).await
        }
        Command::Unprovision {
            descriptor,
            remove_data,
        } => {
            let request =
                ProvisioningRequest::component(read_descriptor(descriptor)?, *remove_data);
            orchestrator.unprovision(&request).await
        }
        Command::UpdateAcl { descriptor, refs } => {
            let request = UpdateAclRequest {
                refs: refs.clone(),
                provision_info: ProvisionInfo {
                    request: read_descriptor(descriptor)?,
                    result: String::new(),
                },
            };
            orchestrator.update_acl(&request).await
        }
    };

    match outcome {
        Ok(status) => {
            print_json(&status)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            report(&failure)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn build_orchestrator(
    config: &ProvisionerConfig,
    directory_file: Option<&Path>,
) -> Result<ProvisionOrchestrator> {
    let directory: Arc<dyn DirectoryLookup> = match (&config.ldap, directory_file) {
        (Some(ldap), _) => Arc::new(LdapDirectory::connect(ldap.clone())),
        (None, Some(path)) => Arc::new(
            StaticDirectory::from_file(path).context("Failed to load the directory file")?,
        ),
        (None, None) => bail!("No directory configured: set LDAP_URL or DIRECTORY_FILE"),
    };
    let resolver = DirectoryPrincipalResolver::new(directory);

    let ranger =
        RangerRestClient::new(&config.ranger).context("Failed to create Ranger client")?;
    let filesystem =
        WebHdfsGateway::new(&config.hdfs).context("Failed to create WebHDFS client")?;

    Ok(ProvisionOrchestrator::new(
        Arc::new(resolver),
        Arc::new(RangerService::new(ranger)),
        Arc::new(filesystem),
        &config.ranger,
    ))
}

fn read_descriptor(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read descriptor {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render the result")?;
    println!("{}", rendered);
    Ok(())
}

#[derive(Serialize)]
struct FailureReport {
    errors: Vec<String>,
}

fn report(failure: &FailedOperation) -> Result<()> {
    for problem in failure.problems() {
        match &problem.cause {
            Some(cause) => error!("{} (cause: {})", problem.description, cause),
            None => error!("{}", problem.description),
        }
    }
    print_json(&FailureReport {
        errors: failure.descriptions(),
    })
}
