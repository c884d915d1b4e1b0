//! Network stack payloads: vnet, subnet, NSG, public IP and NIC.

use serde::{Deserialize, Serialize};

use super::{Cidr, SubResource};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VirtualNetwork {
    pub location: String,
    pub properties: VirtualNetworkProperties,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VirtualNetworkProperties {
    pub address_space: AddressSpace,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AddressSpace {
    pub address_prefixes: Vec<String>,
}

impl VirtualNetwork {
    pub fn new(location: &str, address_space: Cidr) -> Self {
        Self {
            location: location.to_string(),
            properties: VirtualNetworkProperties {
                address_space: AddressSpace {
                    address_prefixes: vec![address_space.to_string()],
                },
            },
        }
    }
}

/// Subnets are child resources of a vnet and carry no location.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Subnet {
    pub properties: SubnetProperties,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SubnetProperties {
    pub address_prefix: String,
}

impl Subnet {
    pub fn new(address_prefix: Cidr) -> Self {
        Self {
            properties: SubnetProperties {
                address_prefix: address_prefix.to_string(),
            },
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NetworkSecurityGroup {
    pub location: String,
    pub properties: NetworkSecurityGroupProperties,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSecurityGroupProperties {
    pub security_rules: Vec<SecurityRule>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SecurityRule {
    pub name: String,
    pub properties: SecurityRuleProperties,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SecurityRuleProperties {
    pub protocol: String,
    pub direction: String,
    pub access: String,
    pub priority: u32,
    pub source_address_prefix: String,
    pub destination_address_prefix: String,
    pub source_port_range: String,
    pub destination_port_range: String,
}

/// Priority of the single inbound SSH rule.
pub const SSH_RULE_PRIORITY: u32 = 1000;

impl SecurityRule {
    /// Inbound TCP/22 from anywhere.
    pub fn allow_ssh() -> Self {
        Self {
            name: "AllowSSH".to_string(),
            properties: SecurityRuleProperties {
                protocol: "Tcp".to_string(),
                direction: "Inbound".to_string(),
                access: "Allow".to_string(),
                priority: SSH_RULE_PRIORITY,
                source_address_prefix: "*".to_string(),
                destination_address_prefix: "*".to_string(),
                source_port_range: "*".to_string(),
                destination_port_range: "22".to_string(),
            },
        }
    }
}

impl NetworkSecurityGroup {
    /// The whole security policy: one inbound SSH allow rule, nothing else.
    pub fn ssh_only(location: &str) -> Self {
        Self {
            location: location.to_string(),
            properties: NetworkSecurityGroupProperties {
                security_rules: vec![SecurityRule::allow_ssh()],
            },
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PublicIpAddress {
    pub location: String,
    pub properties: PublicIpAddressProperties,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PublicIpAddressProperties {
    #[serde(rename = "publicIPAllocationMethod")]
    pub public_ip_allocation_method: String,
}

impl PublicIpAddress {
    pub fn dynamic(location: &str) -> Self {
        Self {
            location: location.to_string(),
            properties: PublicIpAddressProperties {
                public_ip_allocation_method: "Dynamic".to_string(),
            },
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NetworkInterface {
    pub location: String,
    pub properties: NetworkInterfaceProperties,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterfaceProperties {
    pub ip_configurations: Vec<IpConfiguration>,
    pub network_security_group: SubResource,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct IpConfiguration {
    pub name: String,
    pub properties: IpConfigurationProperties,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct IpConfigurationProperties {
    pub subnet: SubResource,
    #[serde(rename = "publicIPAddress")]
    pub public_ip_address: SubResource,
    #[serde(rename = "privateIPAllocationMethod")]
    pub private_ip_allocation_method: String,
}

impl NetworkInterface {
    /// NIC with a single `ipconfig1` bound to subnet + public IP, guarded by the NSG.
    pub fn new(location: &str, subnet_id: &str, public_ip_id: &str, nsg_id: &str) -> Self {
        Self {
            location: location.to_string(),
            properties: NetworkInterfaceProperties {
                ip_configurations: vec![IpConfiguration {
                    name: "ipconfig1".to_string(),
                    properties: IpConfigurationProperties {
                        subnet: SubResource::new(subnet_id),
                        public_ip_address: SubResource::new(public_ip_id),
                        private_ip_allocation_method: "Dynamic".to_string(),
                    },
                }],
                network_security_group: SubResource::new(nsg_id),
            },
        }
    }
}
