//! Credential resolution for Azure Resource Manager.

use azure_core::auth::TokenCredential;
use azure_identity::DefaultAzureCredentialBuilder;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{ProvisionError, Result};

/// OAuth scope for the management plane.
pub const ARM_SCOPE: &str = "https://management.azure.com/.default";

/// Resolve the ambient credential chain (environment, managed identity, Azure CLI).
///
/// Building the chain never fails; a missing source only shows up on the
/// first token request.
pub fn resolve_credential() -> Arc<dyn TokenCredential> {
    Arc::new(DefaultAzureCredentialBuilder::new().build())
}

/// Fetch a bearer token for [`ARM_SCOPE`].
pub async fn bearer_token(credential: &dyn TokenCredential) -> Result<String> {
    let token = credential.get_token(&[ARM_SCOPE]).await.map_err(|e| {
        log::error!("Token request failed: {e}");
        ProvisionError::CredentialError(e.to_string())
    })?;
    Ok(token.token.secret().to_string())
}

/// [`bearer_token`] bounded by `limit`, for sources that may hang (e.g. the Azure CLI).
pub async fn bearer_token_within(credential: &dyn TokenCredential, limit: Duration) -> Result<String> {
    tokio::time::timeout(limit, bearer_token(credential))
        .await
        .map_err(|_| {
            log::error!("Token request timed out after {limit:?}");
            ProvisionError::Timeout {
                operation: "Azure credential token".to_string(),
                limit,
            }
        })?
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use azure_core::auth::AccessToken;

    /// Credential that hands out a fixed token, or never answers.
    #[derive(Debug)]
    pub(crate) struct StaticCredential {
        pub hang: bool,
    }

    #[async_trait::async_trait]
    impl TokenCredential for StaticCredential {
        async fn get_token(&self, scopes: &[&str]) -> azure_core::Result<AccessToken> {
            assert_eq!(scopes, &[ARM_SCOPE]);
            if self.hang {
                std::future::pending::<()>().await;
            }
            let expires_on = azure_core::date::parse_rfc3339("2099-01-01T00:00:00Z")?;
            Ok(AccessToken::new("test-token", expires_on))
        }

        async fn clear_cache(&self) -> azure_core::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_bearer_token() {
        let token = bearer_token(&StaticCredential { hang: false }).await.unwrap();
        assert_eq!(token, "test-token");
    }

    #[tokio::test]
    async fn test_hanging_credential_times_out() {
        let err = bearer_token_within(&StaticCredential { hang: true }, Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, ProvisionError::Timeout { .. }));
    }
}
