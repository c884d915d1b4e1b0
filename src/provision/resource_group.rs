//! Resource group manager.
//!
//! Every mutation is preceded by an existence check and skipped when the
//! check makes it redundant.

use regex::Regex;
use std::sync::OnceLock;

use super::Outcome;
use crate::azure::ResourceApi;
use crate::error::{ProvisionError, Result};
use crate::models::ResourceGroup;
use crate::output::StatusReporter;

/// Azure naming rule: 1-90 of alphanumerics, `-_.()`, not ending in a period.
static NAME_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_name_regex() -> &'static Regex {
    NAME_REGEX.get_or_init(|| Regex::new(r"^[-\w._()]{1,90}$").expect("Invalid Regex"))
}

/// Reject names the provider would refuse, before any cloud call.
pub fn validate_resource_group_name(name: &str) -> Result<()> {
    if get_name_regex().is_match(name) && !name.ends_with('.') {
        Ok(())
    } else {
        Err(ProvisionError::UsageError(format!(
            "invalid resource group name '{name}'"
        )))
    }
}

pub struct ResourceGroupManager<'a> {
    api: &'a dyn ResourceApi,
    status: &'a dyn StatusReporter,
}

impl<'a> ResourceGroupManager<'a> {
    pub fn new(api: &'a dyn ResourceApi, status: &'a dyn StatusReporter) -> Self {
        Self { api, status }
    }

    pub async fn exists(&self, name: &str) -> Result<bool> {
        self.status
            .info(&format!("Validating resource group '{name}'..."));
        let exists = self.api.group_exists(name).await?;
        log::info!("resource group '{name}' exists={exists}");
        Ok(exists)
    }

    /// Create `name` in `location` unless it already exists.
    ///
    /// # Arguments
    /// * `environment` - Recorded as the `environment` tag
    /// * `name` - Resource group name
    /// * `location` - Provider region code, e.g. `eastus`
    pub async fn create(&self, environment: &str, name: &str, location: &str) -> Result<Outcome> {
        validate_resource_group_name(name)?;
        if self.exists(name).await? {
            self.status.info(&format!(
                "Resource group '{name}' already exists. Skipping creation."
            ));
            return Ok(Outcome::Skipped);
        }

        self.status.action(&format!(
            "Creating resource group '{name}' in '{location}' (env '{environment}')..."
        ));
        let created = self
            .api
            .create_group(name, &ResourceGroup::new(location, environment))
            .await?;
        self.status.success(&format!(
            "Resource group '{}' created successfully.",
            created.name.as_deref().unwrap_or(name)
        ));
        Ok(Outcome::Applied)
    }

    /// Delete `name` and wait for completion, unless it does not exist.
    pub async fn delete(&self, name: &str) -> Result<Outcome> {
        validate_resource_group_name(name)?;
        if !self.exists(name).await? {
            self.status.warn(&format!(
                "Resource group '{name}' does not exist. Nothing to delete."
            ));
            return Ok(Outcome::Skipped);
        }

        self.status
            .action(&format!("Deleting resource group '{name}'..."));
        self.api.delete_group(name).await?;
        self.status
            .success(&format!("Resource group '{name}' deleted successfully."));
        Ok(Outcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{RecordingStatus, StatusKind};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// In-memory resource groups that record every call.
    #[derive(Default)]
    struct FakeGroups {
        groups: Mutex<HashSet<String>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeGroups {
        fn with(name: &str) -> Self {
            let fake = Self::default();
            fake.groups.lock().unwrap().insert(name.to_string());
            fake
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ResourceApi for FakeGroups {
        async fn group_exists(&self, name: &str) -> Result<bool> {
            self.calls.lock().unwrap().push(format!("exists:{name}"));
            Ok(self.groups.lock().unwrap().contains(name))
        }

        async fn create_group(&self, name: &str, group: &ResourceGroup) -> Result<ResourceGroup> {
            self.calls.lock().unwrap().push(format!("create:{name}"));
            self.groups.lock().unwrap().insert(name.to_string());
            Ok(ResourceGroup {
                name: Some(name.to_string()),
                ..group.clone()
            })
        }

        async fn delete_group(&self, name: &str) -> Result<()> {
            self.calls.lock().unwrap().push(format!("delete:{name}"));
            self.groups.lock().unwrap().remove(name);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_create_absent_group() {
        let api = FakeGroups::default();
        let status = RecordingStatus::new();
        let manager = ResourceGroupManager::new(&api, &status);
        let outcome = manager.create("dev", "rg-mlops-dev", "eastus").await.unwrap();
        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(api.calls(), vec!["exists:rg-mlops-dev", "create:rg-mlops-dev"]);
        assert!(status.contains(StatusKind::Success, "created successfully"));
    }

    #[tokio::test]
    async fn test_create_existing_group_is_noop() {
        let api = FakeGroups::with("rg-mlops-dev");
        let status = RecordingStatus::new();
        let manager = ResourceGroupManager::new(&api, &status);
        let outcome = manager.create("dev", "rg-mlops-dev", "eastus").await.unwrap();
        assert_eq!(outcome, Outcome::Skipped);
        assert_eq!(api.calls(), vec!["exists:rg-mlops-dev"]);
        assert!(status.contains(StatusKind::Info, "Skipping creation"));
    }

    #[tokio::test]
    async fn test_create_twice_is_idempotent() {
        let api = FakeGroups::default();
        let status = RecordingStatus::new();
        let manager = ResourceGroupManager::new(&api, &status);
        let first = manager.create("dev", "rg1", "eastus").await.unwrap();
        let second = manager.create("dev", "rg1", "eastus").await.unwrap();
        assert_eq!((first, second), (Outcome::Applied, Outcome::Skipped));
        assert_eq!(api.calls(), vec!["exists:rg1", "create:rg1", "exists:rg1"]);
    }

    #[tokio::test]
    async fn test_delete_absent_group_is_noop() {
        let api = FakeGroups::default();
        let status = RecordingStatus::new();
        let manager = ResourceGroupManager::new(&api, &status);
        assert_eq!(manager.delete("rg1").await.unwrap(), Outcome::Skipped);
        assert_eq!(api.calls(), vec!["exists:rg1"]);
        assert!(status.contains(StatusKind::Warn, "Nothing to delete"));
    }

    #[tokio::test]
    async fn test_delete_existing_group() {
        let api = FakeGroups::with("rg1");
        let status = RecordingStatus::new();
        let manager = ResourceGroupManager::new(&api, &status);
        assert_eq!(manager.delete("rg1").await.unwrap(), Outcome::Applied);
        assert_eq!(api.calls(), vec!["exists:rg1", "delete:rg1"]);
    }

    #[tokio::test]
    async fn test_invalid_name_makes_no_calls() {
        let api = FakeGroups::default();
        let status = RecordingStatus::new();
        let manager = ResourceGroupManager::new(&api, &status);
        let err = manager.create("dev", "bad/name", "eastus").await.unwrap_err();
        assert!(matches!(err, ProvisionError::UsageError(_)));
        assert!(api.calls().is_empty());
    }

    #[test]
    fn test_validate_resource_group_name() {
        assert!(validate_resource_group_name("rg-mlops_dev.(1)").is_ok());
        assert!(validate_resource_group_name("").is_err());
        assert!(validate_resource_group_name("ends.with.dot.").is_err());
        assert!(validate_resource_group_name("has space").is_err());
        assert!(validate_resource_group_name(&"a".repeat(91)).is_err());
    }
}
