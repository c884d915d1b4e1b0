//! Model deployer (placeholder).

use async_trait::async_trait;
use std::time::Duration;

use super::Service;
use crate::config::AppConfig;
use crate::error::Result;
use crate::output::StatusReporter;

pub struct ModelDeployer {
    delay: Duration,
}

impl ModelDeployer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for ModelDeployer {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[async_trait]
impl Service for ModelDeployer {
    fn kind(&self) -> &'static str {
        "model"
    }

    async fn run(
        &self,
        name: &str,
        environment: &str,
        _config: &AppConfig,
        status: &dyn StatusReporter,
    ) -> Result<()> {
        status.header(self.kind());
        status.action(&format!(
            "Preparing to deploy model '{name}' in env '{environment}'..."
        ));
        tokio::time::sleep(self.delay).await;
        status.success(&format!("Model '{name}' deployed successfully."));
        Ok(())
    }
}
