//! Request and response models for Azure Resource Manager.
//!
//! This module contains the typed payloads exchanged with the management API:
//! - [`Cidr`] - IPv4 address space with CIDR notation support
//! - [`ResourceGroup`] - Resource group create payload and response
//! - [`VirtualNetwork`], [`Subnet`], [`NetworkSecurityGroup`], [`PublicIpAddress`],
//!   [`NetworkInterface`] - Network stack payloads
//! - [`VirtualMachine`] - Linux VM create payload
//! - [`ArmResource`] - The identifier-bearing part of any created resource

mod cidr;
mod compute;
mod network;
mod resource;
mod resource_group;

// Re-export public types
pub use cidr::{get_cidr_mask, Cidr, MAX_LENGTH};
pub use compute::{
    HardwareProfile, ImageReference, LinuxConfiguration, ManagedDisk, NetworkInterfaceReference,
    NetworkProfile, OsDisk, OsProfile, SshConfiguration, SshPublicKey, StorageProfile,
    VirtualMachine, VirtualMachineProperties,
};
pub use network::{
    AddressSpace, IpConfiguration, IpConfigurationProperties, NetworkInterface,
    NetworkInterfaceProperties, NetworkSecurityGroup, NetworkSecurityGroupProperties,
    PublicIpAddress, PublicIpAddressProperties, SecurityRule, SecurityRuleProperties, Subnet,
    SubnetProperties, VirtualNetwork, VirtualNetworkProperties,
};
pub use resource::{ArmResource, ProvisioningProperties, SubResource};
pub use resource_group::ResourceGroup;
