//! Command-line and interactive front-end.
//!
//! - [`args`] - clap definitions for `<service> <action> <env> <name> [extra]`
//! - [`dispatch`] - Routing parsed commands to the managers
//! - [`interactive`] - The prompt-driven menu used when no command is given
//! - [`prompt`] - Prompt sources (terminal and scripted)

mod args;
mod dispatch;
mod interactive;
mod prompt;

use clap::error::ErrorKind;
use clap::Parser;
use std::ffi::OsString;

use crate::config::{default_config_path, load_config};
use crate::error::{ProvisionError, Result};

pub use args::{Cli, Command, ModelAction, PipelineAction, ResourceAction, VmAction};
pub use dispatch::{Context, Dispatcher};
pub use interactive::{InteractiveMenu, DELETE_CONFIRMATION};
pub use prompt::{InquirePrompt, Prompt, ScriptedPrompt};

/// Parse `args`, load the config and run the selected operation.
///
/// Every failure is reported once through the status reporter before it is
/// returned; callers only map it to an exit code.
pub async fn run<I, T>(args: I, ctx: &Context<'_>, prompt: &mut dyn Prompt) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let status = ctx.status;
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            status.plain(e.to_string().trim_end());
            return Ok(());
        }
        Err(e) => {
            let rendered = e.to_string();
            let reason = rendered
                .lines()
                .next()
                .unwrap_or("invalid arguments")
                .trim_start_matches("error: ")
                .to_string();
            log::warn!("Argument error: {reason}");
            status.error(&reason);
            status.usage();
            return Err(ProvisionError::UsageError(reason));
        }
    };

    let path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = match load_config(&path) {
        Ok(config) => config,
        Err(e) => {
            status.error(&format!("Failed to load config: {e}"));
            return Err(e);
        }
    };
    status.info("Configuration load done");
    log::info!("is_interactive: {}", config.interactive);

    let dispatcher = Dispatcher::new(ctx, &config);
    let result = match &cli.command {
        Some(command) => {
            log::info!("Dispatching {} command", command.service());
            dispatcher.dispatch(command).await
        }
        None if config.interactive => {
            InteractiveMenu::new(&dispatcher, &config, status)
                .run(prompt)
                .await
        }
        None => {
            status.header("resource");
            status.error("No arguments provided and interactive mode is disabled.");
            status.usage();
            return Err(ProvisionError::UsageError("no arguments".to_string()));
        }
    };

    if let Err(e) = &result {
        log::error!("{e}");
        status.error(&e.to_string());
    }
    result
}
