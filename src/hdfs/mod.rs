// Copyright (c) 2025 - Cowboy AI, Inc.
//! HDFS access
//!
//! - [`ActiveNodeLocator`] - Finds the active NameNode of an HA pair
//! - [`WebHdfsGateway`] - Creates and deletes folders through WebHDFS

pub mod namenode;
pub mod webhdfs;

use async_trait::async_trait;

use crate::errors::ProvisionResult;

pub use namenode::ActiveNodeLocator;
pub use webhdfs::WebHdfsGateway;

/// Filesystem Gateway contract
///
/// Both operations return the path they acted upon.
#[async_trait]
pub trait FilesystemGateway: Send + Sync {
    /// Create a folder, with its missing parents
    ///
    /// Fails unless the filesystem confirms the creation.
    async fn create_folder(&self, path: &str) -> ProvisionResult<String>;

    /// Recursively delete a folder
    ///
    /// Deleting a folder that does not exist succeeds.
    async fn delete_folder(&self, path: &str) -> ProvisionResult<String>;
}
