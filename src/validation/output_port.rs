// Copyright (c) 2025 - Cowboy AI, Inc.
//! Output port validation

use tracing::{error, info};

use crate::domain::{parse_component, ComponentHeader, DataProduct, OutputPort, STORAGE_KIND};
use crate::errors::{FailedOperation, ProvisionResult};

/// Parse and validate an output port component node
///
/// The port must depend on exactly one component of the data product, and
/// that component must be a storage area.
pub fn validate(dp: &DataProduct, node: &serde_json::Value) -> ProvisionResult<OutputPort> {
    info!("Parsing Output Port Component");
    let port: OutputPort = parse_component(node)?;

    let dependency = match port.depends_on.as_slice() {
        [single] => single,
        deps => {
            return Err(fail(format!(
                "Expected exactly a dependency for the component {}, found: {}",
                port.id,
                deps.len()
            )))
        }
    };

    let dependency_node = dp.component(dependency).ok_or_else(|| {
        fail(format!(
            "Component with ID {} not found in the Descriptor",
            dependency
        ))
    })?;

    let header: ComponentHeader = parse_component(dependency_node)?;
    if !header.kind.eq_ignore_ascii_case(STORAGE_KIND) {
        return Err(fail(format!(
            "Kind of dependent component {} is not right. Expected: {}, found: {}",
            header.id, STORAGE_KIND, header.kind
        )));
    }

    info!("Validation of OutputPort {} completed successfully", port.id);
    Ok(port)
}

fn fail(message: String) -> FailedOperation {
    error!("{}", message);
    FailedOperation::message(message)
}
