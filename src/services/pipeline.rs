//! Data pipeline runner (placeholder).

use async_trait::async_trait;
use std::time::Duration;

use super::Service;
use crate::config::AppConfig;
use crate::error::Result;
use crate::output::StatusReporter;

pub struct PipelineRunner {
    delay: Duration,
}

impl PipelineRunner {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for PipelineRunner {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[async_trait]
impl Service for PipelineRunner {
    fn kind(&self) -> &'static str {
        "pipeline"
    }

    async fn run(
        &self,
        name: &str,
        environment: &str,
        config: &AppConfig,
        status: &dyn StatusReporter,
    ) -> Result<()> {
        status.header(self.kind());
        status.action(&format!(
            "Preparing to run pipeline '{name}' in env '{environment}'..."
        ));
        status.info(&format!(
            "Contact: {}",
            config.contact_email.as_deref().unwrap_or("n/a")
        ));
        tokio::time::sleep(self.delay).await;
        status.success(&format!("Pipeline '{name}' finished successfully."));
        Ok(())
    }
}
