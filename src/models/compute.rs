//! Virtual machine create payload.

use serde::{Deserialize, Serialize};

use super::SubResource;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VirtualMachine {
    pub location: String,
    pub properties: VirtualMachineProperties,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineProperties {
    pub hardware_profile: HardwareProfile,
    pub storage_profile: StorageProfile,
    pub os_profile: OsProfile,
    pub network_profile: NetworkProfile,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct HardwareProfile {
    pub vm_size: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StorageProfile {
    pub image_reference: ImageReference,
    pub os_disk: OsDisk,
}

/// Marketplace image. `version` may be `latest`, so builds are not pinned across runs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    pub publisher: String,
    pub offer: String,
    pub sku: String,
    pub version: String,
}

impl Default for ImageReference {
    fn default() -> Self {
        Self {
            publisher: "Canonical".to_string(),
            offer: "0001-com-ubuntu-server-noble".to_string(),
            sku: "24_04-lts-gen2".to_string(),
            version: "latest".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OsDisk {
    pub create_option: String,
    pub managed_disk: ManagedDisk,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ManagedDisk {
    pub storage_account_type: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OsProfile {
    pub computer_name: String,
    pub admin_username: String,
    pub linux_configuration: LinuxConfiguration,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LinuxConfiguration {
    pub disable_password_authentication: bool,
    pub ssh: SshConfiguration,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SshConfiguration {
    pub public_keys: Vec<SshPublicKey>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SshPublicKey {
    pub path: String,
    pub key_data: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProfile {
    pub network_interfaces: Vec<NetworkInterfaceReference>,
}

pub type NetworkInterfaceReference = SubResource;

impl VirtualMachine {
    /// Linux VM with key-only SSH login for `admin_username`, bound to one NIC.
    #[allow(clippy::too_many_arguments)]
    pub fn linux(
        location: &str,
        computer_name: &str,
        vm_size: &str,
        image: &ImageReference,
        os_disk_type: &str,
        admin_username: &str,
        ssh_key_data: &str,
        nic_id: &str,
    ) -> Self {
        Self {
            location: location.to_string(),
            properties: VirtualMachineProperties {
                hardware_profile: HardwareProfile {
                    vm_size: vm_size.to_string(),
                },
                storage_profile: StorageProfile {
                    image_reference: image.clone(),
                    os_disk: OsDisk {
                        create_option: "FromImage".to_string(),
                        managed_disk: ManagedDisk {
                            storage_account_type: os_disk_type.to_string(),
                        },
                    },
                },
                os_profile: OsProfile {
                    computer_name: computer_name.to_string(),
                    admin_username: admin_username.to_string(),
                    linux_configuration: LinuxConfiguration {
                        disable_password_authentication: true,
                        ssh: SshConfiguration {
                            public_keys: vec![SshPublicKey {
                                path: format!("/home/{admin_username}/.ssh/authorized_keys"),
                                key_data: ssh_key_data.trim().to_string(),
                            }],
                        },
                    },
                },
                network_profile: NetworkProfile {
                    network_interfaces: vec![SubResource::new(nic_id)],
                },
            },
        }
    }
}
