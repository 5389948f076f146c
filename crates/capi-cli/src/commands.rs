use clap::Subcommand;

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Start the server and keep it running until Ctrl+C
    Serve,

    /// Control the server interactively from stdin
    Console,
}
