//! Resource group payload.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ProvisioningProperties;

/// Tag value recorded as `managed-by` on every group this tool creates.
pub const MANAGED_BY: &str = "az-provision";

/// Azure resource group as sent to and returned by `resourcegroups/{name}`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ResourceGroup {
    #[serde(default, skip_serializing)]
    pub id: Option<String>,
    #[serde(default, skip_serializing)]
    pub name: Option<String>,
    pub location: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
    #[serde(default, skip_serializing)]
    pub properties: Option<ProvisioningProperties>,
}

impl ResourceGroup {
    /// Create payload for a group in `location`, tagged with its environment.
    pub fn new(location: &str, environment: &str) -> Self {
        let mut tags = BTreeMap::new();
        tags.insert("environment".to_string(), environment.to_string());
        tags.insert("managed-by".to_string(), MANAGED_BY.to_string());
        Self {
            location: location.to_string(),
            tags,
            ..Default::default()
        }
    }

    pub fn provisioning_state(&self) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|p| p.provisioning_state.as_deref())
    }
}
