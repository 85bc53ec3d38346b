use std::{process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, warn};
use uuid::Uuid;

use memory_browser::{
    Cli, LaunchOutcome, Launcher, LauncherConfig,
    browser::SystemBrowser,
    env_file,
    launcher::{ProcessRuntime, shutdown_signal},
    readiness::HttpProbe,
};

mod tracing_setup;

use tracing_setup::{FAILURE_TARGET, LogOptions};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let launch_id = Uuid::new_v4().to_string();
    let _guard = tracing_setup::init(LogOptions::from_cli(&cli), Some(launch_id.as_str()));

    match run(cli).await {
        Ok(LaunchOutcome::Completed) => ExitCode::SUCCESS,
        Ok(LaunchOutcome::Interrupted) => {
            println!("\nApplication stopped by user");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(target: FAILURE_TARGET, "Command failed: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<LaunchOutcome> {
    let mut config = LauncherConfig::load(cli.config.as_deref())?;
    config.apply(cli.overrides());
    config.validate().context("Invalid launcher configuration")?;

    let child_env = env_file::load_home_env().unwrap_or_else(|err| {
        warn!("Ignoring env file: {err:#}");
        Vec::new()
    });

    println!("Starting AgentCore Memory Browser...");
    println!("Server will be available at {}", config.url());

    let wait_for_ready = config.wait_for_ready;
    let mut launcher = Launcher::new(
        config,
        Arc::new(ProcessRuntime::new()),
        Arc::new(SystemBrowser::new()),
    )
    .with_child_env(child_env);
    if wait_for_ready {
        match HttpProbe::new() {
            Ok(probe) => launcher = launcher.with_probe(Arc::new(probe)),
            Err(err) => warn!("Readiness check unavailable: {err:#}"),
        }
    }

    let outcome = launcher.launch(shutdown_signal()).await?;
    Ok(outcome)
}
