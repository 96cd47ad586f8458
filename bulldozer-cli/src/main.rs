mod cli;
mod config;
mod logging;
mod preview;
mod session;
mod tui;
mod wizard;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use once_cell::sync::OnceCell;

use cli::commands::{handle_nodes_command, handle_preview_command, handle_select_command};
use cli::{Cli, Commands};
use config::Config;
use tui::RuntimeConfig;

static RUNTIME_CONFIG: OnceCell<RuntimeConfig> = OnceCell::new();

/// How long exit waits for in-flight work before abandoning it
const SHUTDOWN_GRACE: Duration = Duration::from_millis(250);

/// UI settings installed at startup, defaults if nothing was installed
pub fn global_runtime_config() -> &'static RuntimeConfig {
    RUNTIME_CONFIG.get_or_init(RuntimeConfig::default)
}

fn main() {
    if let Err(e) = run() {
        log::error!("{:#}", e);
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_env()?;
    if let Some(file) = &cli.log_file {
        config.logging.file = Some(file.clone());
    }

    logging::init(&config, cli.verbose)?;
    log::info!("bulldozer-cli {} starting", env!("CARGO_PKG_VERSION"));

    if RUNTIME_CONFIG.set(RuntimeConfig::new(config.ui.theme)).is_err() {
        log::warn!("Runtime config was already installed");
    }

    let runtime = build_runtime()?;

    let result = match cli.command {
        Commands::Select(args) => handle_select_command(args, config, runtime.handle().clone()),
        Commands::Nodes(args) => handle_nodes_command(args, config),
        Commands::Preview(args) => handle_preview_command(args, config),
    };

    shutdown_runtime(runtime);
    result
}

fn build_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}

/// Stop the runtime without waiting on fetches that never returned
///
/// Superseded and timed-out previews keep their blocking worker; dropping the
/// runtime would join those threads and hang the exit.
fn shutdown_runtime(runtime: tokio::runtime::Runtime) {
    log::debug!("Shutting down async runtime");
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    use crate::preview::testing::GatedFetcher;
    use crate::preview::{PreviewCoordinator, PreviewOutcome};

    #[test]
    fn test_shutdown_does_not_wait_for_hung_fetch() {
        let runtime = build_runtime().unwrap();
        let (fetcher, gates) = GatedFetcher::new(&["slow"]);
        let mut coordinator =
            PreviewCoordinator::new(Arc::new(fetcher)).with_timeout(Some(Duration::from_millis(20)));

        let (_, outcome) = runtime.block_on(coordinator.request("slow").run());
        assert!(matches!(outcome, PreviewOutcome::Failed(reason) if reason.contains("timed out")));

        // The worker is still blocked on its gate here
        let started = Instant::now();
        shutdown_runtime(runtime);
        assert!(started.elapsed() < Duration::from_secs(2));

        drop(gates);
    }
}
