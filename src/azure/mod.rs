//! Azure Resource Manager access.
//!
//! This module handles all Azure-related operations:
//! - [`api`] - The resource, network and compute service traits
//! - [`credential`] - Ambient credential resolution
//! - [`arm`] - REST calls and long-running operation polling
//! - [`clients`] - Typed clients and the factory that builds them

mod api;
mod arm;
mod clients;
mod credential;

// Re-export public types and functions
pub use api::{ComputeApi, NetworkApi, ResourceApi};
pub use arm::{error_message, provisioning_state, retry_after, ArmClient, OperationState, OperationStatus, ARM_ENDPOINT};
pub use clients::{
    AzureClientFactory, ClientFactory, CloudClients, ComputeClient, NetworkClient, ResourceClient,
};
pub use credential::{bearer_token, bearer_token_within, resolve_credential, ARM_SCOPE};
