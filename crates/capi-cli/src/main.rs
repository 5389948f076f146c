//! capi - run and supervise a local Copilot API server
//!
//! # Examples
//!
//! ```bash
//! # Serve until Ctrl+C
//! capi serve
//!
//! # Interactive control on another port
//! capi --port 8080 console
//! ```

use capi_cli::{Cli, CliResult, Commands, ConsoleUi, FileSettings, logger, run_console, serve};
use capi_config::Config;
use capi_core::Supervisor;
use capi_server::EmbeddedServer;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use log::info;
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let mut config = Config::load()?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate()?;

    logger::initialize(
        config.logging.level,
        config.log_file_path()?,
        config.logging.colored,
    )?;

    info!("Starting capi v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let ui = Arc::new(ConsoleUi::stdio());
    let settings = Arc::new(FileSettings::new(config.server.clone(), cli.port));
    let supervisor = Supervisor::new(
        Arc::new(EmbeddedServer::new()),
        settings,
        ui.clone(),
        ui.clone(),
    )
    .with_starting_hint_delay(config.supervisor.starting_hint_delay());

    match cli.command {
        Commands::Serve => serve(&supervisor).await,
        Commands::Console => {
            run_console(&supervisor, &ui, BufReader::new(tokio::io::stdin())).await
        }
    }
}
