//! Service seams for the three management domains.
//!
//! Provisioning code only talks to these traits. Each mutating method returns
//! once the provider reports the operation finished.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    ArmResource, NetworkInterface, NetworkSecurityGroup, PublicIpAddress, ResourceGroup, Subnet,
    VirtualMachine, VirtualNetwork,
};

/// `Microsoft.Resources` resource groups.
#[async_trait]
pub trait ResourceApi: Send + Sync {
    async fn group_exists(&self, name: &str) -> Result<bool>;

    /// Create or update the group and wait until it is provisioned.
    async fn create_group(&self, name: &str, group: &ResourceGroup) -> Result<ResourceGroup>;

    /// Delete the group and wait for the provider to finish.
    async fn delete_group(&self, name: &str) -> Result<()>;
}

/// `Microsoft.Network` resources inside one resource group.
#[async_trait]
pub trait NetworkApi: Send + Sync {
    async fn create_virtual_network(
        &self,
        resource_group: &str,
        name: &str,
        vnet: &VirtualNetwork,
    ) -> Result<ArmResource>;

    /// Subnets are addressed through the identifier of their parent vnet.
    async fn create_subnet(&self, vnet_id: &str, name: &str, subnet: &Subnet)
        -> Result<ArmResource>;

    async fn create_security_group(
        &self,
        resource_group: &str,
        name: &str,
        nsg: &NetworkSecurityGroup,
    ) -> Result<ArmResource>;

    async fn create_public_ip(
        &self,
        resource_group: &str,
        name: &str,
        public_ip: &PublicIpAddress,
    ) -> Result<ArmResource>;

    async fn create_network_interface(
        &self,
        resource_group: &str,
        name: &str,
        nic: &NetworkInterface,
    ) -> Result<ArmResource>;
}

/// `Microsoft.Compute` virtual machines.
#[async_trait]
pub trait ComputeApi: Send + Sync {
    async fn create_virtual_machine(
        &self,
        resource_group: &str,
        name: &str,
        vm: &VirtualMachine,
    ) -> Result<ArmResource>;

    /// Graceful power-off. The VM stays allocated.
    async fn power_off(&self, resource_group: &str, name: &str) -> Result<()>;

    /// Release the compute allocation. Disks and IPs are kept.
    async fn deallocate(&self, resource_group: &str, name: &str) -> Result<()>;
}
