//! Network stack provisioning.
//!
//! Steps run strictly in order and each waits for the provider: a child
//! payload embeds the identifier its parent call returned. A failed step aborts
//! the rest; resources from earlier steps are left in place.

use crate::azure::NetworkApi;
use crate::config::NetworkSection;
use crate::error::Result;
use crate::models::{NetworkInterface, NetworkSecurityGroup, PublicIpAddress, Subnet, VirtualNetwork};
use crate::output::StatusReporter;

/// Resource identifiers of a provisioned network stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkStack {
    pub vnet_id: String,
    pub subnet_id: String,
    pub nsg_id: String,
    pub public_ip_id: String,
    pub nic_id: String,
}

pub struct NetworkProvisioner<'a> {
    api: &'a dyn NetworkApi,
    status: &'a dyn StatusReporter,
}

impl<'a> NetworkProvisioner<'a> {
    pub fn new(api: &'a dyn NetworkApi, status: &'a dyn StatusReporter) -> Self {
        Self { api, status }
    }

    /// Create vnet → subnet → NSG → public IP → NIC in `resource_group`.
    pub async fn provision(
        &self,
        resource_group: &str,
        location: &str,
        network: &NetworkSection,
    ) -> Result<NetworkStack> {
        self.status.action(&format!(
            "Creating Virtual Network '{}' ({})...",
            network.vnet_name, network.vnet_cidr
        ));
        let vnet = self
            .api
            .create_virtual_network(
                resource_group,
                &network.vnet_name,
                &VirtualNetwork::new(location, network.vnet_cidr),
            )
            .await
            .map_err(|e| e.at_step("Virtual network"))?;
        log::info!("vnet id={}", vnet.id);

        self.status.action(&format!(
            "Creating Subnet '{}' ({})...",
            network.subnet_name, network.subnet_cidr
        ));
        let subnet = self
            .api
            .create_subnet(&vnet.id, &network.subnet_name, &Subnet::new(network.subnet_cidr))
            .await
            .map_err(|e| e.at_step("Subnet"))?;
        log::info!("subnet id={}", subnet.id);

        self.status.action(&format!(
            "Creating NSG '{}' (allow SSH)...",
            network.nsg_name
        ));
        let nsg = self
            .api
            .create_security_group(
                resource_group,
                &network.nsg_name,
                &NetworkSecurityGroup::ssh_only(location),
            )
            .await
            .map_err(|e| e.at_step("Network security group"))?;
        log::info!("nsg id={}", nsg.id);

        self.status.action(&format!(
            "Creating Public IP '{}'...",
            network.public_ip_name
        ));
        let public_ip = self
            .api
            .create_public_ip(
                resource_group,
                &network.public_ip_name,
                &PublicIpAddress::dynamic(location),
            )
            .await
            .map_err(|e| e.at_step("Public IP address"))?;
        log::info!("public ip id={}", public_ip.id);

        self.status.action(&format!(
            "Creating Network Interface '{}'...",
            network.nic_name
        ));
        let nic = self
            .api
            .create_network_interface(
                resource_group,
                &network.nic_name,
                &NetworkInterface::new(location, &subnet.id, &public_ip.id, &nsg.id),
            )
            .await
            .map_err(|e| e.at_step("Network interface"))?;
        log::info!("nic id={}", nic.id);

        self.status.success("Network stack ready.");
        Ok(NetworkStack {
            vnet_id: vnet.id,
            subnet_id: subnet.id,
            nsg_id: nsg.id,
            public_ip_id: public_ip.id,
            nic_id: nic.id,
        })
    }
}
