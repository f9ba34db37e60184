// Copyright (c) 2025 - Cowboy AI, Inc.
//! Descriptor Validator
//!
//! Turns a raw [`ProvisioningRequest`] into a validated [`ProvisionRequest`]:
//!
//! ```text
//! descriptor kind == COMPONENT_DESCRIPTOR
//!     ↓
//! parse YAML descriptor
//!     ↓
//! find componentIdToProvision ──→ find its kind
//!     ↓
//! storage    → storage_area::validate
//! outputport → output_port::validate
//! other      → unsupported kind
//! ```
//!
//! The first failing step short-circuits the pipeline. No external system is
//! contacted here.

pub mod output_port;
pub mod storage_area;

use tracing::{error, info};

use crate::domain::{
    parse_descriptor, Component, DescriptorKind, ProvisionRequest, ProvisioningRequest,
    OUTPUTPORT_KIND, STORAGE_KIND,
};
use crate::errors::{FailedOperation, ProvisionResult};

/// Validate a provisioning request
pub fn validate(request: &ProvisioningRequest) -> ProvisionResult<ProvisionRequest> {
    info!("Starting Descriptor validation");

    if request.descriptor_kind != DescriptorKind::ComponentDescriptor {
        return Err(fail(format!(
            "The descriptorKind field is not valid. Expected: '{}', Actual: '{}'",
            DescriptorKind::ComponentDescriptor,
            request.descriptor_kind
        )));
    }

    let descriptor = parse_descriptor(&request.descriptor)?;
    let component_id = &descriptor.component_id_to_provision;
    let dp = &descriptor.data_product;

    info!("Checking component to provision {} is in the descriptor", component_id);
    let node = dp.component(component_id).ok_or_else(|| {
        fail(format!(
            "Component with ID {} not found in the Descriptor",
            component_id
        ))
    })?;

    let kind = dp.component_kind(component_id).ok_or_else(|| {
        fail(format!(
            "Component Kind not found for the component with ID {}",
            component_id
        ))
    })?;

    let component = match kind {
        STORAGE_KIND => Component::StorageArea(storage_area::validate(node)?),
        OUTPUTPORT_KIND => Component::OutputPort(output_port::validate(dp, node)?),
        other => {
            return Err(fail(format!(
                "The kind '{}' of the component to provision is not supported by this Specific Provisioner",
                other
            )))
        }
    };

    Ok(ProvisionRequest {
        data_product: descriptor.data_product,
        component,
        remove_data: request.remove_data,
    })
}

fn fail(message: String) -> FailedOperation {
    error!("{}", message);
    FailedOperation::message(message)
}
