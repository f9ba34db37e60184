// Copyright (c) 2025 - Cowboy AI, Inc.
//! Storage area validation

use tracing::{error, info};

use crate::domain::{parse_component, ComponentIdentifier, StorageArea};
use crate::errors::{FailedOperation, ProvisionResult};

/// Parse and validate a storage area component node
///
/// Field violations are accumulated; a path that cannot be derived fails
/// the validation as well.
pub fn validate(node: &serde_json::Value) -> ProvisionResult<StorageArea> {
    info!("Parsing Storage Area Component");
    let storage: StorageArea = parse_component(node)?;

    info!(
        "Checking specific section of component {} is of type StorageSpecific",
        storage.id
    );
    let specific = storage.storage_specific().map_err(|e| {
        error!("{}", e);
        e
    })?;

    let violations = specific.field_violations();
    if !violations.is_empty() {
        let failed = FailedOperation::new(violations);
        error!("{}", failed);
        return Err(failed);
    }

    let id = ComponentIdentifier::decode(&storage.id)?;
    specific.path(&id)?;

    info!("Validation of StorageArea {} completed successfully", storage.id);
    Ok(storage)
}
