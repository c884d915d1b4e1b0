//! Interactive menu: service → environment → action → details.

use super::dispatch::Dispatcher;
use super::prompt::Prompt;
use crate::config::AppConfig;
use crate::error::{ProvisionError, Result};
use crate::output::StatusReporter;

/// Literal a delete confirmation must match (case-insensitive).
pub const DELETE_CONFIRMATION: &str = "yes";

pub struct InteractiveMenu<'a> {
    dispatcher: &'a Dispatcher<'a>,
    config: &'a AppConfig,
    status: &'a dyn StatusReporter,
}

impl<'a> InteractiveMenu<'a> {
    pub fn new(
        dispatcher: &'a Dispatcher<'a>,
        config: &'a AppConfig,
        status: &'a dyn StatusReporter,
    ) -> Self {
        Self {
            dispatcher,
            config,
            status,
        }
    }

    pub async fn run(&self, prompt: &mut dyn Prompt) -> Result<()> {
        self.status.info("Interactive mode enabled.");
        self.status.plain("Select service:");
        self.status.plain("  1) Infra Service");
        self.status.plain("  2) Pipeline Service");
        self.status.plain("  3) Deployment Service");
        let choice = prompt.text("Enter choice [1-3]", Some("1"))?;

        match choice.as_str() {
            "1" => self.resource_flow(prompt).await,
            "2" => self.pipeline_flow(prompt).await,
            "3" => self.model_flow(prompt).await,
            other => Err(ProvisionError::UsageError(format!(
                "invalid service choice '{other}'"
            ))),
        }
    }

    fn ask_env(&self, prompt: &mut dyn Prompt) -> Result<String> {
        let env = prompt.text("Environment", Some(self.config.default_env()))?;
        let env = if env.is_empty() {
            self.config.default_env().to_string()
        } else {
            env
        };
        self.status.info(&format!("Selected env: {env}"));
        Ok(env)
    }

    fn ask_required(&self, prompt: &mut dyn Prompt, message: &str, default: Option<&str>, what: &str) -> Result<String> {
        let answer = prompt.text(message, default)?;
        if answer.is_empty() {
            return Err(ProvisionError::UsageError(format!("{what} is required")));
        }
        Ok(answer)
    }

    async fn resource_flow(&self, prompt: &mut dyn Prompt) -> Result<()> {
        self.status.header("resource");
        let env = self.ask_env(prompt)?;

        self.status.plain("Select action:");
        self.status.plain("  1) Create Resource Group");
        self.status.plain("  2) Delete Resource Group");
        let action = prompt.text("Enter choice [1-2]", Some("1"))?;

        let default_name = self.config.resource_group.name.as_deref();
        match action.as_str() {
            "1" => {
                let name = self.ask_required(prompt, "Resource group name", default_name, "Resource group name")?;
                let default_location = self.config.resource_group_location().ok();
                let location = self.ask_required(prompt, "Location", default_location, "Location")?;
                let subscription_id = self.config.subscription_id()?;
                self.dispatcher
                    .create_resource_group(&env, &name, &location, &subscription_id)
                    .await
            }
            "2" => {
                let name = self.ask_required(prompt, "Resource group name", default_name, "Resource group name")?;
                let confirm = prompt.text(
                    &format!("Type '{DELETE_CONFIRMATION}' to delete resource group '{name}'"),
                    None,
                )?;
                if !confirm.trim().eq_ignore_ascii_case(DELETE_CONFIRMATION) {
                    self.status
                        .warn(&format!("Delete of resource group '{name}' cancelled."));
                    return Ok(());
                }
                let subscription_id = self.config.subscription_id()?;
                self.dispatcher
                    .delete_resource_group(&env, &name, &subscription_id)
                    .await
            }
            other => Err(ProvisionError::UsageError(format!(
                "invalid action choice '{other}'"
            ))),
        }
    }

    async fn pipeline_flow(&self, prompt: &mut dyn Prompt) -> Result<()> {
        let env = self.ask_env(prompt)?;
        let name = self.ask_required(prompt, "Pipeline name to run", None, "Pipeline name")?;
        self.dispatcher
            .run_service(self.dispatcher.pipeline(), &name, &env)
            .await
    }

    async fn model_flow(&self, prompt: &mut dyn Prompt) -> Result<()> {
        let env = self.ask_env(prompt)?;
        let name = self.ask_required(prompt, "Model name to deploy", None, "Model name")?;
        self.dispatcher
            .run_service(self.dispatcher.model(), &name, &env)
            .await
    }
}
