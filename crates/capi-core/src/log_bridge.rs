//! Adapts structured server log events to sanitized output lines.

use crate::{Additional, LogArg, LogEvent, OutputSink, inspect, strip_ansi};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::Level;

/// Forwards log events from one server start attempt to the output sink.
///
/// Clones share the same attachment flag. Once [`LogBridge::detach`] has been
/// called, events from a superseded or stopped server are dropped.
#[derive(Clone)]
pub struct LogBridge {
    sink: Arc<dyn OutputSink>,
    attached: Arc<AtomicBool>,
}

impl LogBridge {
    pub fn new(sink: Arc<dyn OutputSink>) -> Self {
        Self {
            sink,
            attached: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Format, sanitize and forward `event`. Blank results are not emitted.
    pub fn publish(&self, event: LogEvent) {
        if !self.is_attached() {
            return;
        }

        if let Some(line) = format_event(&event) {
            self.sink.append_line(&line);
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.publish(LogEvent::new(Level::Info, message));
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.publish(LogEvent::new(Level::Warn, message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.publish(LogEvent::new(Level::Error, message));
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.publish(LogEvent::new(Level::Debug, message));
    }

    pub fn detach(&self) {
        self.attached.store(false, Ordering::SeqCst);
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }
}

/// Render an event as `[level] message additional... args...`.
///
/// Returns `None` when nothing survives trimming and sanitizing.
pub fn format_event(event: &LogEvent) -> Option<String> {
    let mut parts: Vec<String> = Vec::with_capacity(2 + event.args.len());

    parts.push(format!("[{}]", event.level.as_str().to_lowercase()));
    if !event.message.is_empty() {
        parts.push(event.message.clone());
    }

    match &event.additional {
        Additional::None => {}
        Additional::Text(text) => parts.push(text.clone()),
        Additional::List(items) => parts.extend(items.iter().cloned()),
    }

    parts.extend(event.args.iter().map(|arg| match arg {
        LogArg::Text(text) => text.clone(),
        LogArg::Value(value) => inspect(value),
    }));

    let joined = parts.join(" ");
    let line = strip_ansi(joined.trim());
    if line.is_empty() {
        None
    } else {
        Some(line.into_owned())
    }
}
