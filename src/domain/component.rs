// Copyright (c) 2025 - Cowboy AI, Inc.
//! Data product components
//!
//! The provisioner handles a closed set of component kinds, modeled as the
//! [`Component`] sum type. Every dispatch point matches on it exhaustively.

use serde::{Deserialize, Serialize};

use super::identifier::ComponentIdentifier;
use crate::errors::{FailedOperation, Problem, ProvisionResult};

/// Kind tag of storage area components
pub const STORAGE_KIND: &str = "storage";

/// Kind tag of output port components
pub const OUTPUTPORT_KIND: &str = "outputport";

/// Specific section of a storage area
///
/// Either a `prefixPath` under which the conventional data product folder
/// layout is created, or an explicit `rootFolder` + `folder` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StorageSpecific {
    Folder {
        #[serde(rename = "rootFolder")]
        root_folder: String,
        folder: String,
    },
    Prefix {
        #[serde(rename = "prefixPath")]
        prefix_path: String,
    },
}

impl StorageSpecific {
    /// Folder path of the storage area identified by `id`
    ///
    /// - `Folder`: `rootFolder` joined with `folder`
    /// - `Prefix`: `prefixPath/<domain>/data-products/<dp>/<version>/<component>`
    pub fn path(&self, id: &ComponentIdentifier) -> ProvisionResult<String> {
        match self {
            StorageSpecific::Folder { root_folder, folder } => join_path(root_folder, folder),
            StorageSpecific::Prefix { prefix_path } => Ok(format!(
                "{}{}",
                with_trailing_slash(&prefix_path.replace('\\', "/")),
                id.relative_folder()
            )),
        }
    }

    /// Path registered as resource of the data product security zone
    pub fn zone_folder(&self) -> &str {
        match self {
            StorageSpecific::Folder { root_folder, .. } => root_folder,
            StorageSpecific::Prefix { prefix_path } => prefix_path,
        }
    }

    /// Field constraint violations, all of them
    pub fn field_violations(&self) -> Vec<Problem> {
        let mut problems = Vec::new();
        match self {
            StorageSpecific::Folder { root_folder, folder } => {
                if folder.trim().is_empty() {
                    problems.push(Problem::new("component.specific.folder: must not be blank"));
                }
                if root_folder.trim().is_empty() {
                    problems.push(Problem::new(
                        "component.specific.rootFolder: must not be blank",
                    ));
                } else if !root_folder.starts_with('/') {
                    problems.push(Problem::new(
                        "component.specific.rootFolder: Root folder must start with '/'",
                    ));
                }
            }
            StorageSpecific::Prefix { prefix_path } => {
                if prefix_path.trim().is_empty() {
                    problems.push(Problem::new(
                        "component.specific.prefixPath: must not be blank",
                    ));
                }
            }
        }
        problems
    }
}

/// Join two path strings with `/`, normalizing separators
///
/// Backslashes become slashes, repeated and trailing slashes collapse.
pub fn join_path(root: &str, folder: &str) -> ProvisionResult<String> {
    let invalid = || {
        FailedOperation::message(format!(
            "Failed to build path from specific storage. Root folder '{}' or folder '{}' are invalid path strings",
            root, folder
        ))
    };

    if root.contains('\0') || folder.contains('\0') {
        return Err(invalid());
    }

    let joined = format!("{}/{}", root, folder).replace('\\', "/");
    let body = joined
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if joined.starts_with('/') {
        Ok(format!("/{}", body))
    } else if body.is_empty() {
        Err(invalid())
    } else {
        Ok(body)
    }
}

fn with_trailing_slash(prefix: &str) -> String {
    if prefix.ends_with('/') {
        prefix.to_string()
    } else {
        format!("{}/", prefix)
    }
}

/// Storage area component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageArea {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub fully_qualified_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub kind: String,
    #[serde(default)]
    pub specific: Option<StorageSpecific>,
}

impl StorageArea {
    /// The storage specific section, required by every storage operation
    pub fn storage_specific(&self) -> ProvisionResult<&StorageSpecific> {
        self.specific.as_ref().ok_or_else(|| {
            FailedOperation::message(format!(
                "The specific section of the component {} is not of type StorageSpecific",
                self.id
            ))
        })
    }
}

/// Output port component
///
/// An output port exposes exactly one storage area it depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputPort {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub fully_qualified_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub kind: String,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub specific: serde_json::Value,
}

/// Minimal view of any component node: enough to check its kind
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ComponentHeader {
    pub id: String,
    pub kind: String,
}

/// A component the provisioner knows how to handle
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    StorageArea(StorageArea),
    OutputPort(OutputPort),
}

impl Component {
    pub fn id(&self) -> &str {
        match self {
            Component::StorageArea(sa) => &sa.id,
            Component::OutputPort(op) => &op.id,
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            Component::StorageArea(sa) => &sa.kind,
            Component::OutputPort(op) => &op.kind,
        }
    }
}
