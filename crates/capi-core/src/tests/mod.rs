
use crate::{
    CloseError, LaunchError, LogBridge, NotifyLevel, OutputSink, ServerHandle, ServerLauncher,
    SettingsProvider, Supervisor, UiAction, UiNotifier,
};

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use capi_config::ServerConfig;
use tokio::sync::Notify;

/// UI double that records everything it is told.
#[derive(Default)]
pub(crate) struct RecordingUi {
    notifications: Mutex<Vec<(NotifyLevel, String)>>,
    statuses: Mutex<Vec<(String, Option<UiAction>)>>,
    lines: Mutex<Vec<String>>,
}

impl RecordingUi {
    pub(crate) fn notifications(&self) -> Vec<(NotifyLevel, String)> {
        self.notifications.lock().unwrap().clone()
    }

    pub(crate) fn statuses(&self) -> Vec<(String, Option<UiAction>)> {
        self.statuses.lock().unwrap().clone()
    }

    pub(crate) fn last_status(&self) -> Option<(String, Option<UiAction>)> {
        self.statuses.lock().unwrap().last().cloned()
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl UiNotifier for RecordingUi {
    fn notify(&self, level: NotifyLevel, message: &str) {
        self.notifications
            .lock()
            .unwrap()
            .push((level, message.to_owned()));
    }

    fn set_status_text(&self, text: &str, action: Option<UiAction>) {
        self.statuses.lock().unwrap().push((text.to_owned(), action));
    }
}

impl OutputSink for RecordingUi {
    fn append_line(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_owned());
    }
}

/// Settings double whose port can be changed between attempts.
pub(crate) struct FakeSettings(Mutex<ServerConfig>);

impl FakeSettings {
    pub(crate) fn with_port(port: u32) -> Self {
        Self(Mutex::new(ServerConfig {
            port,
            ..ServerConfig::default()
        }))
    }

    pub(crate) fn set_port(&self, port: u32) {
        self.0.lock().unwrap().port = port;
    }
}

impl SettingsProvider for FakeSettings {
    fn snapshot(&self) -> ServerConfig {
        self.0.lock().unwrap().clone()
    }
}

pub(crate) enum LaunchBehavior {
    Succeed,
    /// Wait for the gate before succeeding.
    Gated(Arc<Notify>),
    /// Wait for the gate before failing.
    GatedFail(Arc<Notify>, String),
    Fail(String),
    PortInUse,
}

/// Launcher double that counts servers and closes.
pub(crate) struct FakeLauncher {
    behaviors: Mutex<VecDeque<LaunchBehavior>>,
    close_fails: bool,
    close_gate: Option<Arc<Notify>>,
    pub(crate) entered: Notify,
    pub(crate) starts: AtomicUsize,
    pub(crate) closes: Arc<AtomicUsize>,
    pub(crate) live: Arc<AtomicUsize>,
    pub(crate) bridges: Mutex<Vec<LogBridge>>,
}

impl FakeLauncher {
    pub(crate) fn new() -> Self {
        Self {
            behaviors: Mutex::new(VecDeque::new()),
            close_fails: false,
            close_gate: None,
            entered: Notify::new(),
            starts: AtomicUsize::new(0),
            closes: Arc::new(AtomicUsize::new(0)),
            live: Arc::new(AtomicUsize::new(0)),
            bridges: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing_close() -> Self {
        Self {
            close_fails: true,
            ..Self::new()
        }
    }

    /// Handles wait for `gate` before closing.
    pub(crate) fn with_close_gate(gate: Arc<Notify>) -> Self {
        Self {
            close_gate: Some(gate),
            ..Self::new()
        }
    }

    /// Queue behavior for the next start; an empty queue succeeds.
    pub(crate) fn push(&self, behavior: LaunchBehavior) {
        self.behaviors.lock().unwrap().push_back(behavior);
    }

    pub(crate) fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub(crate) fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub(crate) fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    fn handle(&self) -> Box<dyn ServerHandle> {
        self.live.fetch_add(1, Ordering::SeqCst);
        Box::new(FakeHandle {
            closes: Arc::clone(&self.closes),
            live: Arc::clone(&self.live),
            fail: self.close_fails,
            gate: self.close_gate.clone(),
        })
    }
}

#[async_trait]
impl ServerLauncher for FakeLauncher {
    async fn start(
        &self,
        config: ServerConfig,
        bridge: LogBridge,
    ) -> Result<Box<dyn ServerHandle>, LaunchError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.bridges.lock().unwrap().push(bridge.clone());
        self.entered.notify_one();

        let behavior = self
            .behaviors
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(LaunchBehavior::Succeed);

        match behavior {
            LaunchBehavior::Succeed => {}
            LaunchBehavior::Gated(gate) => gate.notified().await,
            LaunchBehavior::GatedFail(gate, message) => {
                gate.notified().await;
                return Err(LaunchError::failed(message));
            }
            LaunchBehavior::Fail(message) => {
                return Err(LaunchError::Failed {
                    message,
                    trace: Some("at fake::start\nat fake::main".into()),
                });
            }
            LaunchBehavior::PortInUse => {
                return Err(LaunchError::PortInUse {
                    port: config.bind_port().unwrap_or_default(),
                });
            }
        }

        bridge.info(format!("fake server listening on {}", config.port));
        Ok(self.handle())
    }
}

struct FakeHandle {
    closes: Arc<AtomicUsize>,
    live: Arc<AtomicUsize>,
    fail: bool,
    gate: Option<Arc<Notify>>,
}

#[async_trait]
impl ServerHandle for FakeHandle {
    async fn close(self: Box<Self>, _graceful: bool) -> Result<(), CloseError> {
        match &self.gate {
            Some(gate) => gate.notified().await,
            None => tokio::task::yield_now().await,
        }
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.live.fetch_sub(1, Ordering::SeqCst);
        if self.fail {
            Err(CloseError::new("socket already gone"))
        } else {
            Ok(())
        }
    }
}

/// A loopback port that was free a moment ago.
pub(crate) fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

pub(crate) fn supervisor(
    launcher: &Arc<FakeLauncher>,
    settings: &Arc<FakeSettings>,
    ui: &Arc<RecordingUi>,
) -> Arc<Supervisor> {
    Arc::new(
        Supervisor::new(
            launcher.clone(),
            settings.clone(),
            ui.clone(),
            ui.clone(),
        )
        .with_starting_hint_delay(Duration::from_secs(60)),
    )
}
