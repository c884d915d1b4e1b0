//! Provision Azure resource groups and a Linux VM with its network stack.
//!
//! Control flow: [`cli`] → [`config`] → [`azure`] client factory →
//! [`provision`] managers. Each step waits for the provider to confirm the
//! previous one before the next starts.

pub mod azure;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod provision;
pub mod services;

pub use cli::run;
pub use error::{ProvisionError, Result};
