//! Pipeline and model-deployment services.
//!
//! Both are placeholders behind the [`Service`] seam until real
//! implementations exist: they report progress, pause, and succeed.

mod model;
mod pipeline;

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::error::Result;
use crate::output::StatusReporter;

pub use model::ModelDeployer;
pub use pipeline::PipelineRunner;

#[async_trait]
pub trait Service: Send + Sync {
    /// Service keyword used for the banner, e.g. `pipeline`.
    fn kind(&self) -> &'static str;

    async fn run(
        &self,
        name: &str,
        environment: &str,
        config: &AppConfig,
        status: &dyn StatusReporter,
    ) -> Result<()>;
}
