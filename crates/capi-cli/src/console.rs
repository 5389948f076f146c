//! The `serve` and `console` host loops.

use crate::{CliError, CliResult, ConsoleCommand, ConsoleUi};

use capi_core::{StartOutcome, Supervisor};
use log::{info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const PROMPT_HINT: &str = "Type 'help' for a list of commands.";

/// Start the server and keep it up until Ctrl+C.
pub async fn serve(supervisor: &Supervisor) -> CliResult<()> {
    match supervisor.start().await {
        Ok(StartOutcome::Started { endpoint }) => info!("Serving on {endpoint}"),
        Ok(outcome) => warn!("Unexpected start outcome: {outcome:?}"),
        Err(e) => return Err(CliError::start(e.user_message())),
    }

    tokio::signal::ctrl_c().await?;
    info!("Received Ctrl+C, shutting down");
    supervisor.shutdown().await;

    Ok(())
}

/// Read commands line by line until `quit` or end of input.
///
/// Failed commands are reported through the UI and do not end the loop.
/// The server is always shut down before returning.
pub async fn run_console<R>(supervisor: &Supervisor, ui: &ConsoleUi, input: R) -> CliResult<()>
where
    R: AsyncBufRead + Unpin,
{
    ui.print(PROMPT_HINT);
    let mut lines = input.lines();

    let result = loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break Ok(()),
            Err(e) => break Err(CliError::from(e)),
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<ConsoleCommand>() {
            Ok(ConsoleCommand::Quit) => break Ok(()),
            Ok(command) => execute(supervisor, ui, command).await,
            Err(message) => ui.print(&message),
        }
    };

    supervisor.shutdown().await;
    result
}

async fn execute(supervisor: &Supervisor, ui: &ConsoleUi, command: ConsoleCommand) {
    match command {
        ConsoleCommand::Start => {
            // Failures are already reported through the UI notifier
            let _ = supervisor.start().await;
        }
        ConsoleCommand::Restart => {
            let _ = supervisor.restart().await;
        }
        ConsoleCommand::Stop => supervisor.stop().await,
        ConsoleCommand::Status => {
            let line = match supervisor.endpoint() {
                Some(endpoint) => format!("Status: {} ({endpoint})", supervisor.status()),
                None => format!("Status: {}", supervisor.status()),
            };
            ui.print(&line);
        }
        ConsoleCommand::Endpoint => {
            if let Some(endpoint) = supervisor.copy_endpoint() {
                ui.print(&endpoint);
            }
        }
        ConsoleCommand::Usage => {
            if let Some(url) = supervisor.usage_viewer_url() {
                ui.print(&url);
            }
        }
        ConsoleCommand::Help => {
            for command in ConsoleCommand::ALL {
                ui.print(&format!("  {:<10}{}", command.as_str(), command.description()));
            }
        }
        ConsoleCommand::Quit => {}
    }
}
