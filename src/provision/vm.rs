//! Virtual machine provisioning and power operations.
//!
//! Power state is owned by the provider; nothing is tracked locally.

use std::path::Path;

use super::network::NetworkProvisioner;
use super::resource_group::{validate_resource_group_name, ResourceGroupManager};
use crate::azure::CloudClients;
use crate::config::{AppConfig, NetworkSection, VmSpec};
use crate::error::{ProvisionError, Result};
use crate::models::VirtualMachine;
use crate::output::StatusReporter;

/// Read the SSH public key to install for the admin user.
pub fn read_ssh_public_key(path: &Path) -> Result<String> {
    let key = std::fs::read_to_string(path).map_err(|e| {
        log::error!("Unable to read SSH key {}: {e}", path.display());
        ProvisionError::KeyFileNotFound {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ProvisionError::KeyFileNotFound {
            path: path.to_path_buf(),
            message: "file is empty".to_string(),
        });
    }
    Ok(key.to_string())
}

/// Everything a VM create needs, resolved locally before any cloud call.
#[derive(Debug, Clone)]
pub struct VmPlan {
    pub resource_group: String,
    pub location: String,
    pub spec: VmSpec,
    pub ssh_key_data: String,
    pub network: NetworkSection,
}

impl VmPlan {
    /// Resolve required keys, validate the group name and read the SSH key.
    ///
    /// # Arguments
    /// * `config` - Loaded settings
    /// * `vm_name` - Overrides `vm.name` when given
    pub fn from_config(config: &AppConfig, vm_name: Option<&str>) -> Result<Self> {
        let resource_group = config.resource_group_name()?.to_string();
        validate_resource_group_name(&resource_group)?;
        let mut spec = config.vm_spec()?;
        if let Some(name) = vm_name {
            spec.name = name.to_string();
        }
        let ssh_key_data = read_ssh_public_key(&spec.ssh_public_key_path)?;
        Ok(Self {
            resource_group,
            location: config.resource_group_location()?.to_string(),
            spec,
            ssh_key_data,
            network: config.network.clone(),
        })
    }

    pub fn payload(&self, nic_id: &str) -> VirtualMachine {
        VirtualMachine::linux(
            &self.location,
            &self.spec.name,
            &self.spec.size,
            &self.spec.image,
            &self.spec.os_disk_type,
            &self.spec.admin_username,
            &self.ssh_key_data,
            nic_id,
        )
    }
}

pub struct VmProvisioner<'a> {
    clients: &'a CloudClients,
    status: &'a dyn StatusReporter,
}

impl<'a> VmProvisioner<'a> {
    pub fn new(clients: &'a CloudClients, status: &'a dyn StatusReporter) -> Self {
        Self { clients, status }
    }

    /// Ensure the resource group, build the network stack, then create the VM.
    pub async fn create(&self, environment: &str, plan: &VmPlan) -> Result<String> {
        self.status.action(&format!(
            "Starting VM creation: {} in {}",
            plan.spec.name, plan.location
        ));

        ResourceGroupManager::new(self.clients.resources.as_ref(), self.status)
            .create(environment, &plan.resource_group, &plan.location)
            .await
            .map_err(|e| e.at_step("Resource group"))?;

        let stack = NetworkProvisioner::new(self.clients.network.as_ref(), self.status)
            .provision(&plan.resource_group, &plan.location, &plan.network)
            .await?;

        self.status.action(&format!(
            "Creating VM '{}' ({}, {}:{}:{}:{}) ... this may take a few minutes.",
            plan.spec.name,
            plan.spec.size,
            plan.spec.image.publisher,
            plan.spec.image.offer,
            plan.spec.image.sku,
            plan.spec.image.version
        ));
        let vm = self
            .clients
            .compute
            .create_virtual_machine(&plan.resource_group, &plan.spec.name, &plan.payload(&stack.nic_id))
            .await
            .map_err(|e| e.at_step("Virtual machine"))?;

        self.status.success(&format!(
            "VM '{}' created successfully in {}.",
            plan.spec.name, plan.location
        ));
        Ok(vm.id)
    }

    /// Graceful power-off. The VM stays allocated and billed for compute.
    pub async fn stop(&self, resource_group: &str, name: &str) -> Result<()> {
        self.status.action(&format!("Stopping VM '{name}'..."));
        self.clients
            .compute
            .power_off(resource_group, name)
            .await
            .map_err(|e| e.at_step("Power off"))?;
        self.status
            .success(&format!("VM '{name}' stopped successfully."));
        Ok(())
    }

    /// Release the compute allocation; disks and IPs are retained.
    pub async fn deallocate(&self, resource_group: &str, name: &str) -> Result<()> {
        self.status.action(&format!(
            "Deallocating VM '{name}' (releases compute)..."
        ));
        self.clients
            .compute
            .deallocate(resource_group, name)
            .await
            .map_err(|e| e.at_step("Deallocate"))?;
        self.status.success(&format!(
            "VM '{name}' deallocated successfully (no compute cost)."
        ));
        Ok(())
    }
}
