//! Provisioning sequences built on the cloud service traits.
//!
//! - [`resource_group`] - Idempotent create/delete of resource groups
//! - [`network`] - The ordered vnet → subnet → NSG → public IP → NIC sequence
//! - [`vm`] - VM create, power-off and deallocate

mod network;
mod resource_group;
mod vm;

/// What a guarded mutation ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The mutating call was issued and completed.
    Applied,
    /// The existence check made the call redundant.
    Skipped,
}

pub use network::{NetworkProvisioner, NetworkStack};
pub use resource_group::{validate_resource_group_name, ResourceGroupManager};
pub use vm::{read_ssh_public_key, VmPlan, VmProvisioner};
