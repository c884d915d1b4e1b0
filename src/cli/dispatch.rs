//! Dispatch of parsed commands onto the provisioning managers.
//!
//! Every cloud-touching operation resolves what it needs from the config
//! first, then connects, then runs. A failed lookup never reaches the cloud.

use super::args::{Command, ModelAction, PipelineAction, ResourceAction, VmAction};
use crate::azure::ClientFactory;
use crate::config::AppConfig;
use crate::error::{ProvisionError, Result};
use crate::output::StatusReporter;
use crate::provision::{validate_resource_group_name, ResourceGroupManager, VmPlan, VmProvisioner};
use crate::services::Service;

/// External collaborators the front-end drives.
pub struct Context<'a> {
    pub factory: &'a dyn ClientFactory,
    pub status: &'a dyn StatusReporter,
    pub pipeline: &'a dyn Service,
    pub model: &'a dyn Service,
}

pub struct Dispatcher<'a> {
    ctx: &'a Context<'a>,
    config: &'a AppConfig,
}

impl<'a> Dispatcher<'a> {
    pub fn new(ctx: &'a Context<'a>, config: &'a AppConfig) -> Self {
        Self { ctx, config }
    }

    pub fn pipeline(&self) -> &'a dyn Service {
        self.ctx.pipeline
    }

    pub fn model(&self) -> &'a dyn Service {
        self.ctx.model
    }

    pub async fn dispatch(&self, command: &Command) -> Result<()> {
        match command {
            Command::Resource(ResourceAction::Create {
                env,
                rg_name,
                location,
            }) => {
                let location = match location {
                    Some(l) => l.clone(),
                    None => self.config.resource_group_location()?.to_string(),
                };
                let subscription_id = self.config.subscription_id()?;
                self.create_resource_group(env, rg_name, &location, &subscription_id)
                    .await
            }
            Command::Resource(ResourceAction::Delete { env, rg_name }) => {
                let subscription_id = self.config.subscription_id()?;
                self.delete_resource_group(env, rg_name, &subscription_id)
                    .await
            }
            Command::Vm(VmAction::Create { env, vm_name }) => {
                self.create_vm(env, vm_name.as_deref()).await
            }
            Command::Vm(VmAction::Stop { env, vm_name }) => {
                self.stop_vm(env, vm_name.as_deref()).await
            }
            Command::Vm(VmAction::Deallocate { env, vm_name }) => {
                self.deallocate_vm(env, vm_name.as_deref()).await
            }
            Command::Pipeline(PipelineAction::Run { env, pipeline_name }) => {
                self.run_service(self.ctx.pipeline, pipeline_name, env).await
            }
            Command::Model(ModelAction::Deploy { env, model_name }) => {
                self.run_service(self.ctx.model, model_name, env).await
            }
        }
    }

    /// Create a resource group unless it already exists.
    pub async fn create_resource_group(
        &self,
        environment: &str,
        name: &str,
        location: &str,
        subscription_id: &str,
    ) -> Result<()> {
        validate_resource_group_name(name)?;
        self.ctx.status.header("resource");
        self.ctx
            .status
            .info(&format!("Environment '{environment}', subscription {subscription_id}"));
        let clients = self.ctx.factory.connect(subscription_id, self.config).await?;
        ResourceGroupManager::new(clients.resources.as_ref(), self.ctx.status)
            .create(environment, name, location)
            .await?;
        Ok(())
    }

    /// Delete a resource group if it exists, waiting for completion.
    pub async fn delete_resource_group(
        &self,
        environment: &str,
        name: &str,
        subscription_id: &str,
    ) -> Result<()> {
        validate_resource_group_name(name)?;
        self.ctx.status.header("resource");
        self.ctx
            .status
            .info(&format!("Environment '{environment}', subscription {subscription_id}"));
        let clients = self.ctx.factory.connect(subscription_id, self.config).await?;
        ResourceGroupManager::new(clients.resources.as_ref(), self.ctx.status)
            .delete(name)
            .await?;
        Ok(())
    }

    pub async fn create_vm(&self, environment: &str, vm_name: Option<&str>) -> Result<()> {
        let plan = VmPlan::from_config(self.config, vm_name)?;
        let subscription_id = self.config.subscription_id()?;
        self.ctx.status.header("vm");
        let clients = self.ctx.factory.connect(&subscription_id, self.config).await?;
        VmProvisioner::new(&clients, self.ctx.status)
            .create(environment, &plan)
            .await?;
        Ok(())
    }

    pub async fn stop_vm(&self, environment: &str, vm_name: Option<&str>) -> Result<()> {
        let (resource_group, name, subscription_id) = self.vm_target(vm_name)?;
        self.ctx.status.header("vm");
        self.ctx.status.info(&format!("Environment '{environment}'"));
        let clients = self.ctx.factory.connect(&subscription_id, self.config).await?;
        VmProvisioner::new(&clients, self.ctx.status)
            .stop(&resource_group, &name)
            .await
    }

    pub async fn deallocate_vm(&self, environment: &str, vm_name: Option<&str>) -> Result<()> {
        let (resource_group, name, subscription_id) = self.vm_target(vm_name)?;
        self.ctx.status.header("vm");
        self.ctx.status.info(&format!("Environment '{environment}'"));
        let clients = self.ctx.factory.connect(&subscription_id, self.config).await?;
        VmProvisioner::new(&clients, self.ctx.status)
            .deallocate(&resource_group, &name)
            .await
    }

    fn vm_target(&self, vm_name: Option<&str>) -> Result<(String, String, String)> {
        let name = match vm_name {
            Some(name) => name.to_string(),
            None => self.config.vm_name()?.to_string(),
        };
        Ok((
            self.config.resource_group_name()?.to_string(),
            name,
            self.config.subscription_id()?,
        ))
    }

    pub async fn run_service(&self, service: &dyn Service, name: &str, environment: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(ProvisionError::UsageError(format!(
                "{} name is required",
                service.kind()
            )));
        }
        service
            .run(name, environment, self.config, self.ctx.status)
            .await
    }
}
