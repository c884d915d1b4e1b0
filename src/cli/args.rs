//! Command-line arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::CONFIG_PATH_ENV;

#[derive(Parser, Debug)]
#[command(name = "az-provision", version)]
#[command(about = "Provision Azure resource groups and a Linux VM with its network stack", long_about = None)]
pub struct Cli {
    /// Settings file (default: config/config.json)
    #[arg(short, long, global = true, env = CONFIG_PATH_ENV)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Resource group management
    #[command(subcommand)]
    Resource(ResourceAction),
    /// Virtual machine lifecycle
    #[command(subcommand)]
    Vm(VmAction),
    /// Data pipelines
    #[command(subcommand)]
    Pipeline(PipelineAction),
    /// Model deployment
    #[command(subcommand)]
    Model(ModelAction),
}

impl Command {
    /// Service keyword, as used for banners.
    pub fn service(&self) -> &'static str {
        match self {
            Command::Resource(_) => "resource",
            Command::Vm(_) => "vm",
            Command::Pipeline(_) => "pipeline",
            Command::Model(_) => "model",
        }
    }
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ResourceAction {
    /// Create a resource group unless it exists
    Create {
        env: String,
        rg_name: String,
        /// Region; defaults to resource_group.location
        location: Option<String>,
    },
    /// Delete a resource group if it exists
    Delete { env: String, rg_name: String },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum VmAction {
    /// Create the network stack and the VM
    Create { env: String, vm_name: Option<String> },
    /// Gracefully power off (stays allocated)
    Stop { env: String, vm_name: Option<String> },
    /// Release compute allocation
    Deallocate { env: String, vm_name: Option<String> },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum PipelineAction {
    Run { env: String, pipeline_name: String },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ModelAction {
    Deploy { env: String, model_name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("az-provision").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_resource_create() {
        let cli = parse(&["resource", "create", "dev", "rg1", "westeurope"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Resource(ResourceAction::Create {
                env: "dev".into(),
                rg_name: "rg1".into(),
                location: Some("westeurope".into()),
            }))
        );
    }

    #[test]
    fn test_parse_no_args() {
        let cli = parse(&[]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_config_flag() {
        let cli = parse(&["--config", "other.json", "model", "deploy", "dev", "m1"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("other.json")));
        assert_eq!(cli.command.unwrap().service(), "model");
    }

    #[test]
    fn test_insufficient_args_rejected() {
        for args in [
            vec!["resource", "create", "dev"],
            vec!["resource", "delete", "dev"],
            vec!["pipeline", "run", "dev"],
            vec!["model", "deploy", "dev"],
            vec!["vm", "stop"],
            vec!["resource"],
            vec!["bogus", "x"],
        ] {
            assert!(parse(&args).is_err(), "{args:?} should not parse");
        }
    }
}
