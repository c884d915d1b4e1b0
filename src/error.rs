//! Error types for configuration, cloud access and provisioning.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Every failure the tool can report.
///
/// Cloud-side failures inside a provisioning sequence are re-labelled with
/// [`ProvisionError::at_step`] so the status line names the failed step.
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Config parse error in {path}: {message}")]
    ConfigParseError { path: String, message: String },

    #[error("Missing config key: {0}")]
    ConfigMissingKey(String),

    #[error("Credential error: {0}")]
    CredentialError(String),

    #[error("Cloud service error: {0}")]
    CloudServiceError(String),

    #[error("{step} failed: {message}")]
    ResourceOperationError { step: String, message: String },

    #[error("SSH public key not readable: {}: {message}", .path.display())]
    KeyFileNotFound { path: PathBuf, message: String },

    #[error("Invalid CIDR: {0}")]
    InvalidCidr(String),

    #[error("Usage error: {0}")]
    UsageError(String),

    #[error("Timed out after {limit:?} waiting for {operation}")]
    Timeout { operation: String, limit: Duration },

    #[error("Prompt failed: {0}")]
    Prompt(String),
}

pub type Result<T> = std::result::Result<T, ProvisionError>;

impl ProvisionError {
    /// Process exit code for this failure (usage errors follow the clap convention).
    pub fn exit_code(&self) -> u8 {
        match self {
            ProvisionError::UsageError(_) => 2,
            _ => 1,
        }
    }

    /// Attribute a cloud-side failure to a named provisioning step.
    ///
    /// The variant is kept: a provider rejection stays a
    /// `ResourceOperationError`, a service failure stays a `CloudServiceError`.
    pub fn at_step(self, step: &str) -> Self {
        match self {
            ProvisionError::ResourceOperationError { message, .. } => {
                ProvisionError::ResourceOperationError {
                    step: step.to_string(),
                    message,
                }
            }
            ProvisionError::CloudServiceError(message) => {
                ProvisionError::CloudServiceError(format!("{step}: {message}"))
            }
            ProvisionError::Timeout { limit, .. } => ProvisionError::Timeout {
                operation: step.to_string(),
                limit,
            },
            other => other,
        }
    }
}

impl From<reqwest::Error> for ProvisionError {
    fn from(e: reqwest::Error) -> Self {
        ProvisionError::CloudServiceError(e.to_string())
    }
}

impl From<inquire::InquireError> for ProvisionError {
    fn from(e: inquire::InquireError) -> Self {
        ProvisionError::Prompt(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ProvisionError::UsageError("x".into()).exit_code(), 2);
        assert_eq!(
            ProvisionError::ConfigNotFound(PathBuf::from("config/config.json")).exit_code(),
            1
        );
        assert_eq!(ProvisionError::CredentialError("x".into()).exit_code(), 1);
    }

    #[test]
    fn test_at_step_relabels_cloud_errors() {
        let e = ProvisionError::CloudServiceError("503 Service Unavailable".into())
            .at_step("Subnet");
        assert!(matches!(e, ProvisionError::CloudServiceError(_)));
        assert_eq!(e.to_string(), "Cloud service error: Subnet: 503 Service Unavailable");

        let e = ProvisionError::ResourceOperationError {
            step: "PUT virtualNetworks/vnet-mlops".into(),
            message: "InvalidAddressPrefix".into(),
        }
        .at_step("Virtual network");
        assert_eq!(e.to_string(), "Virtual network failed: InvalidAddressPrefix");
    }

    #[test]
    fn test_timeout_message_keeps_subsecond_limit() {
        let e = ProvisionError::Timeout {
            operation: "HEAD rg".into(),
            limit: Duration::from_millis(300),
        }
        .at_step("Check resource group");
        assert_eq!(
            e.to_string(),
            "Timed out after 300ms waiting for Check resource group"
        );
    }

    #[test]
    fn test_at_step_keeps_other_errors() {
        let e = ProvisionError::CredentialError("no token".into()).at_step("Subnet");
        assert!(matches!(e, ProvisionError::CredentialError(_)));
    }
}
