use log::Level;
use serde_json::Value;

/// Extra text attached to an event after its message.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Additional {
    #[default]
    None,
    Text(String),
    List(Vec<String>),
}

/// Positional argument attached to an event.
#[derive(Debug, Clone, PartialEq)]
pub enum LogArg {
    /// Passed through verbatim.
    Text(String),
    /// Rendered with [`crate::inspect`].
    Value(Value),
}

impl From<&str> for LogArg {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for LogArg {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Value> for LogArg {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// A structured log event emitted by the embedded server.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub level: Level,
    pub message: String,
    pub additional: Additional,
    pub args: Vec<LogArg>,
}

impl LogEvent {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            additional: Additional::None,
            args: Vec::new(),
        }
    }

    pub fn with_additional(mut self, additional: Additional) -> Self {
        self.additional = additional;
        self
    }

    pub fn with_arg(mut self, arg: impl Into<LogArg>) -> Self {
        self.args.push(arg.into());
        self
    }
}
