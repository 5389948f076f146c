use std::fmt;
use std::str::FromStr;

/// A line typed at the `capi console` prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Start,
    Stop,
    Restart,
    Status,
    Endpoint,
    Usage,
    Help,
    Quit,
}

impl ConsoleCommand {
    pub const ALL: [ConsoleCommand; 8] = [
        Self::Start,
        Self::Stop,
        Self::Restart,
        Self::Status,
        Self::Endpoint,
        Self::Usage,
        Self::Help,
        Self::Quit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
            Self::Status => "status",
            Self::Endpoint => "endpoint",
            Self::Usage => "usage",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Start => "start the server",
            Self::Stop => "stop the server",
            Self::Restart => "restart with current settings",
            Self::Status => "show server status",
            Self::Endpoint => "print the server endpoint",
            Self::Usage => "print the usage dashboard link",
            Self::Help => "list commands",
            Self::Quit => "stop the server and exit",
        }
    }
}

impl fmt::Display for ConsoleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsoleCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            "restart" => Ok(Self::Restart),
            "status" => Ok(Self::Status),
            "endpoint" | "copy" => Ok(Self::Endpoint),
            "usage" => Ok(Self::Usage),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!(
                "Unknown command '{other}'. Type 'help' for a list of commands."
            )),
        }
    }
}
