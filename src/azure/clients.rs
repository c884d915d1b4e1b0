//! Typed clients for resource, network and compute management, and the factory
//! that builds them from a subscription id.

use async_trait::async_trait;
use std::sync::Arc;

use super::api::{ComputeApi, NetworkApi, ResourceApi};
use super::arm::ArmClient;
use super::credential::{bearer_token_within, resolve_credential};
use crate::config::AppConfig;
use crate::error::Result;
use crate::models::{
    ArmResource, NetworkInterface, NetworkSecurityGroup, PublicIpAddress, ResourceGroup, Subnet,
    VirtualMachine, VirtualNetwork,
};

const RESOURCES_API_VERSION: &str = "2021-04-01";
const NETWORK_API_VERSION: &str = "2023-09-01";
const COMPUTE_API_VERSION: &str = "2024-03-01";

const NETWORK_NAMESPACE: &str = "Microsoft.Network";
const COMPUTE_NAMESPACE: &str = "Microsoft.Compute";

fn to_body<T: serde::Serialize>(payload: &T, step: &str) -> Result<serde_json::Value> {
    serde_json::to_value(payload).map_err(|e| crate::error::ProvisionError::ResourceOperationError {
        step: step.to_string(),
        message: format!("unable to encode request: {e}"),
    })
}

pub struct ResourceClient {
    arm: Arc<ArmClient>,
}

impl ResourceClient {
    pub fn new(arm: Arc<ArmClient>) -> Self {
        Self { arm }
    }

    fn group_url(&self, name: &str) -> String {
        let path = format!("/subscriptions/{}/resourcegroups/{name}", self.arm.subscription_id());
        self.arm.url(&path, RESOURCES_API_VERSION)
    }
}

#[async_trait]
impl ResourceApi for ResourceClient {
    async fn group_exists(&self, name: &str) -> Result<bool> {
        self.arm
            .exists(&self.group_url(name), &format!("Check resource group '{name}'"))
            .await
    }

    async fn create_group(&self, name: &str, group: &ResourceGroup) -> Result<ResourceGroup> {
        let step = format!("Create resource group '{name}'");
        let body = to_body(group, &step)?;
        self.arm.put_and_wait(&self.group_url(name), &body, &step).await
    }

    async fn delete_group(&self, name: &str) -> Result<()> {
        self.arm
            .delete_and_wait(&self.group_url(name), &format!("Delete resource group '{name}'"))
            .await
    }
}

pub struct NetworkClient {
    arm: Arc<ArmClient>,
}

impl NetworkClient {
    pub fn new(arm: Arc<ArmClient>) -> Self {
        Self { arm }
    }

    async fn put<T: serde::Serialize + Sync>(
        &self,
        resource_group: &str,
        kind: &str,
        name: &str,
        payload: &T,
    ) -> Result<ArmResource> {
        let step = format!("Create {kind}/{name}");
        let body = to_body(payload, &step)?;
        let path = self.arm.resource_path(resource_group, NETWORK_NAMESPACE, kind, name);
        self.arm
            .put_and_wait(&self.arm.url(&path, NETWORK_API_VERSION), &body, &step)
            .await
    }
}

#[async_trait]
impl NetworkApi for NetworkClient {
    async fn create_virtual_network(
        &self,
        resource_group: &str,
        name: &str,
        vnet: &VirtualNetwork,
    ) -> Result<ArmResource> {
        self.put(resource_group, "virtualNetworks", name, vnet).await
    }

    async fn create_subnet(&self, vnet_id: &str, name: &str, subnet: &Subnet) -> Result<ArmResource> {
        let step = format!("Create subnets/{name}");
        let body = to_body(subnet, &step)?;
        let url = self
            .arm
            .url(&format!("{vnet_id}/subnets/{name}"), NETWORK_API_VERSION);
        self.arm.put_and_wait(&url, &body, &step).await
    }

    async fn create_security_group(
        &self,
        resource_group: &str,
        name: &str,
        nsg: &NetworkSecurityGroup,
    ) -> Result<ArmResource> {
        self.put(resource_group, "networkSecurityGroups", name, nsg)
            .await
    }

    async fn create_public_ip(
        &self,
        resource_group: &str,
        name: &str,
        public_ip: &PublicIpAddress,
    ) -> Result<ArmResource> {
        self.put(resource_group, "publicIPAddresses", name, public_ip)
            .await
    }

    async fn create_network_interface(
        &self,
        resource_group: &str,
        name: &str,
        nic: &NetworkInterface,
    ) -> Result<ArmResource> {
        self.put(resource_group, "networkInterfaces", name, nic).await
    }
}

pub struct ComputeClient {
    arm: Arc<ArmClient>,
}

impl ComputeClient {
    pub fn new(arm: Arc<ArmClient>) -> Self {
        Self { arm }
    }

    fn vm_path(&self, resource_group: &str, name: &str) -> String {
        self.arm
            .resource_path(resource_group, COMPUTE_NAMESPACE, "virtualMachines", name)
    }
}

#[async_trait]
impl ComputeApi for ComputeClient {
    async fn create_virtual_machine(
        &self,
        resource_group: &str,
        name: &str,
        vm: &VirtualMachine,
    ) -> Result<ArmResource> {
        let step = format!("Create virtualMachines/{name}");
        let body = to_body(vm, &step)?;
        let url = self
            .arm
            .url(&self.vm_path(resource_group, name), COMPUTE_API_VERSION);
        self.arm.put_and_wait(&url, &body, &step).await
    }

    async fn power_off(&self, resource_group: &str, name: &str) -> Result<()> {
        let path = format!("{}/powerOff", self.vm_path(resource_group, name));
        self.arm
            .post_and_wait(&self.arm.url(&path, COMPUTE_API_VERSION), &format!("Power off '{name}'"))
            .await
    }

    async fn deallocate(&self, resource_group: &str, name: &str) -> Result<()> {
        let path = format!("{}/deallocate", self.vm_path(resource_group, name));
        self.arm
            .post_and_wait(&self.arm.url(&path, COMPUTE_API_VERSION), &format!("Deallocate '{name}'"))
            .await
    }
}

/// One client per management domain, all bound to the same subscription.
#[derive(Clone)]
pub struct CloudClients {
    pub resources: Arc<dyn ResourceApi>,
    pub network: Arc<dyn NetworkApi>,
    pub compute: Arc<dyn ComputeApi>,
}

/// Builds [`CloudClients`] for a subscription.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    async fn connect(&self, subscription_id: &str, config: &AppConfig) -> Result<CloudClients>;
}

/// Factory backed by the ambient Azure credential chain.
#[derive(Debug, Default)]
pub struct AzureClientFactory;

#[async_trait]
impl ClientFactory for AzureClientFactory {
    /// Resolves credentials and fetches one token up front, so credential
    /// failures abort before any resource call is made.
    async fn connect(&self, subscription_id: &str, config: &AppConfig) -> Result<CloudClients> {
        log::info!("Connecting to subscription {subscription_id}");
        let credential = resolve_credential();
        bearer_token_within(credential.as_ref(), config.operation_timeout()).await?;
        let arm = Arc::new(ArmClient::new(
            credential,
            subscription_id,
            config.poll_interval(),
            config.operation_timeout(),
        ));
        Ok(CloudClients {
            resources: Arc::new(ResourceClient::new(arm.clone())),
            network: Arc::new(NetworkClient::new(arm.clone())),
            compute: Arc::new(ComputeClient::new(arm)),
        })
    }
}
