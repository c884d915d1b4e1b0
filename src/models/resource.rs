//! Shared shapes of Azure Resource Manager resources.

use serde::{Deserialize, Serialize};

/// Reference to another resource by its full resource identifier.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SubResource {
    pub id: String,
}

impl SubResource {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// The parts of a created resource the provisioning sequence threads forward.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ArmResource {
    #[serde(default)]
    pub id: String,
    pub name: Option<String>,
    pub properties: Option<ProvisioningProperties>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningProperties {
    pub provisioning_state: Option<String>,
}

impl ArmResource {
    pub fn provisioning_state(&self) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|p| p.provisioning_state.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arm_resource() {
        let json = r#"{
            "id": "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/virtualNetworks/vnet-mlops",
            "name": "vnet-mlops",
            "type": "Microsoft.Network/virtualNetworks",
            "location": "eastus",
            "properties": {"provisioningState": "Succeeded", "addressSpace": {"addressPrefixes": ["10.0.0.0/16"]}}
        }"#;
        let r: ArmResource = serde_json::from_str(json).unwrap();
        assert!(r.id.ends_with("/virtualNetworks/vnet-mlops"));
        assert_eq!(r.name.as_deref(), Some("vnet-mlops"));
        assert_eq!(r.provisioning_state(), Some("Succeeded"));
    }

    #[test]
    fn test_parse_arm_resource_without_properties() {
        let r: ArmResource = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        assert_eq!(r.provisioning_state(), None);
    }
}
