//! Capabilities the host UI provides to the supervisor.

use std::fmt;

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for NotifyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// Command a status indicator triggers when activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    Start,
    Stop,
}

impl UiAction {
    pub fn command_id(&self) -> &'static str {
        match self {
            Self::Start => "copilotApi.start",
            Self::Stop => "copilotApi.stop",
        }
    }
}

/// Notifications and status indicator updates.
///
/// Status text is pushed while the supervisor holds its state lock, so
/// implementations must not call back into the supervisor.
pub trait UiNotifier: Send + Sync {
    fn notify(&self, level: NotifyLevel, message: &str);

    fn set_status_text(&self, text: &str, action: Option<UiAction>);
}

/// Human-readable line output (the "Output" pane).
pub trait OutputSink: Send + Sync {
    fn append_line(&self, line: &str);
}
