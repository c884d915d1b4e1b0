//! The settings document.
//!
//! Required keys are optional at parse time and only looked up when an
//! operation needs them, so a resource-group run never fails on a missing
//! `vm` section.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::loader::expand_tilde;
use crate::error::{ProvisionError, Result};
use crate::models::{Cidr, ImageReference};

/// Environment variable consulted when no subscription id is configured.
pub const SUBSCRIPTION_ENV: &str = "AZURE_SUBSCRIPTION_ID";

const DEFAULT_ENV: &str = "dev";
const DEFAULT_OPERATION_TIMEOUT_SECS: u64 = 1800;
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

#[derive(Deserialize, Debug, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub interactive: bool,
    pub default_env: Option<String>,
    pub default_location: Option<String>,
    pub subscription_id: Option<String>,
    #[serde(default)]
    pub azure: AzureSection,
    #[serde(default)]
    pub resource_group: ResourceGroupSection,
    #[serde(default)]
    pub network: NetworkSection,
    #[serde(default)]
    pub vm: VmSection,
    pub contact_email: Option<String>,
    pub operation_timeout_secs: Option<u64>,
    pub poll_interval_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct AzureSection {
    pub subscription_id: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ResourceGroupSection {
    pub name: Option<String>,
    pub location: Option<String>,
}

/// Names and address space of the VM network stack.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct NetworkSection {
    pub vnet_name: String,
    pub vnet_cidr: Cidr,
    pub subnet_name: String,
    pub subnet_cidr: Cidr,
    pub nsg_name: String,
    pub public_ip_name: String,
    pub nic_name: String,
}

impl Default for NetworkSection {
    fn default() -> Self {
        Self {
            vnet_name: "vnet-mlops".to_string(),
            vnet_cidr: Cidr {
                addr: std::net::Ipv4Addr::new(10, 0, 0, 0),
                mask: 16,
            },
            subnet_name: "subnet-mlops".to_string(),
            subnet_cidr: Cidr {
                addr: std::net::Ipv4Addr::new(10, 0, 0, 0),
                mask: 24,
            },
            nsg_name: "nsg-mlops".to_string(),
            public_ip_name: "pip-mlops".to_string(),
            nic_name: "nic-mlops".to_string(),
        }
    }
}

impl NetworkSection {
    /// The subnet must sit inside the vnet address space.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.vnet_cidr.contains(&self.subnet_cidr) {
            Ok(())
        } else {
            Err(format!(
                "network.subnet_cidr {} is outside network.vnet_cidr {}",
                self.subnet_cidr, self.vnet_cidr
            ))
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct VmSection {
    pub name: Option<String>,
    pub size: Option<String>,
    pub admin_username: Option<String>,
    pub ssh_public_key_path: Option<String>,
    #[serde(default)]
    pub image: ImageReference,
    pub os_disk_type: Option<String>,
}

/// Fully resolved VM settings, produced by [`AppConfig::vm_spec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmSpec {
    pub name: String,
    pub size: String,
    pub admin_username: String,
    pub ssh_public_key_path: PathBuf,
    pub image: ImageReference,
    pub os_disk_type: String,
}

fn required<'a>(value: &'a Option<String>, key: &str) -> Result<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ProvisionError::ConfigMissingKey(key.to_string())),
    }
}

impl AppConfig {
    /// `subscription_id`, then `azure.subscription_id`, then `$AZURE_SUBSCRIPTION_ID`.
    pub fn subscription_id(&self) -> Result<String> {
        if let Ok(id) = required(&self.subscription_id, "subscription_id") {
            return Ok(id.to_string());
        }
        if let Ok(id) = required(&self.azure.subscription_id, "azure.subscription_id") {
            return Ok(id.to_string());
        }
        match std::env::var(SUBSCRIPTION_ENV) {
            Ok(id) if !id.trim().is_empty() => Ok(id.trim().to_string()),
            _ => Err(ProvisionError::ConfigMissingKey(
                "subscription_id (or azure.subscription_id)".to_string(),
            )),
        }
    }

    pub fn default_env(&self) -> &str {
        self.default_env.as_deref().unwrap_or(DEFAULT_ENV)
    }

    pub fn resource_group_name(&self) -> Result<&str> {
        required(&self.resource_group.name, "resource_group.name")
    }

    /// `resource_group.location`, falling back to `default_location`.
    pub fn resource_group_location(&self) -> Result<&str> {
        required(&self.resource_group.location, "resource_group.location")
            .or_else(|_| required(&self.default_location, "resource_group.location"))
    }

    pub fn vm_name(&self) -> Result<&str> {
        required(&self.vm.name, "vm.name")
    }

    /// Resolve every key a VM create needs, expanding `~` in the key path.
    pub fn vm_spec(&self) -> Result<VmSpec> {
        Ok(VmSpec {
            name: self.vm_name()?.to_string(),
            size: required(&self.vm.size, "vm.size")?.to_string(),
            admin_username: required(&self.vm.admin_username, "vm.admin_username")?.to_string(),
            ssh_public_key_path: expand_tilde(required(
                &self.vm.ssh_public_key_path,
                "vm.ssh_public_key_path",
            )?),
            image: self.vm.image.clone(),
            os_disk_type: self
                .vm
                .os_disk_type
                .clone()
                .unwrap_or_else(|| "StandardSSD_LRS".to_string()),
        })
    }

    /// Upper bound on any single wait for a long-running cloud operation.
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(
            self.operation_timeout_secs
                .unwrap_or(DEFAULT_OPERATION_TIMEOUT_SECS),
        )
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.unwrap_or(DEFAULT_POLL_INTERVAL_SECS))
    }
}
