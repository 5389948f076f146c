use crate::commands::Commands;

use clap::Parser;

#[derive(Parser)]
#[command(name = "capi")]
#[command(about = "Run and supervise a local Copilot API server")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Port to listen on, overriding config.toml and CAPI_PORT
    #[arg(long, global = true)]
    pub port: Option<u32>,
}
