use az_provision::azure::AzureClientFactory;
use az_provision::cli::{Context, InquirePrompt};
use az_provision::output::ConsoleStatus;
use az_provision::services::{ModelDeployer, PipelineRunner};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Do as little as possible in main.rs as it can't contain any tests
    if let Err(e) = log4rs::init_file("log4rs.yml", Default::default()) {
        eprintln!("Logging disabled, unable to load log4rs.yml: {e}");
    }
    dotenv::dotenv().ok();
    //
    log::info!("#Start main()");

    let status = ConsoleStatus::new();
    let pipeline = PipelineRunner::default();
    let model = ModelDeployer::default();
    let ctx = Context {
        factory: &AzureClientFactory,
        status: &status,
        pipeline: &pipeline,
        model: &model,
    };
    let mut prompt = InquirePrompt;

    match az_provision::run(std::env::args_os(), &ctx, &mut prompt).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => ExitCode::from(e.exit_code()),
    }
}
