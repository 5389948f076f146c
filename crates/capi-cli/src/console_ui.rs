//! Terminal adapter for the supervisor's UI ports.

use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

use capi_core::{NotifyLevel, OutputSink, UiAction, UiNotifier};

type Writer = Box<dyn Write + Send>;

/// Prints notifications, status changes and server output to a terminal.
///
/// Info notifications and output go to `out`; warnings and errors go to
/// `err`. The latest status text is kept for the `status` command.
pub struct ConsoleUi {
    out: Mutex<Writer>,
    err: Mutex<Writer>,
    status: Mutex<String>,
}

impl ConsoleUi {
    pub fn new(out: Writer, err: Writer) -> Self {
        Self {
            out: Mutex::new(out),
            err: Mutex::new(err),
            status: Mutex::new(String::new()),
        }
    }

    pub fn stdio() -> Self {
        Self::new(Box::new(io::stdout()), Box::new(io::stderr()))
    }

    /// The last status text published by the supervisor.
    pub fn status_text(&self) -> String {
        lock(&self.status).clone()
    }

    /// Print a line on the normal output stream.
    pub fn print(&self, line: &str) {
        write_line(&self.out, line);
    }
}

impl UiNotifier for ConsoleUi {
    fn notify(&self, level: NotifyLevel, message: &str) {
        let line = format!("[{level}] {message}");
        match level {
            NotifyLevel::Info => write_line(&self.out, &line),
            NotifyLevel::Warning | NotifyLevel::Error => write_line(&self.err, &line),
        }
    }

    fn set_status_text(&self, text: &str, action: Option<UiAction>) {
        *lock(&self.status) = text.to_owned();

        let line = match action {
            Some(action) => format!("{text}  [{}]", action.command_id()),
            None => text.to_owned(),
        };
        write_line(&self.out, &line);
    }
}

impl OutputSink for ConsoleUi {
    fn append_line(&self, line: &str) {
        write_line(&self.out, line);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// Write errors are ignored.
fn write_line(writer: &Mutex<Writer>, line: &str) {
    let mut writer = lock(writer);
    let _ = writeln!(writer, "{line}");
    let _ = writer.flush();
}
