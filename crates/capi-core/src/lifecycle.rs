//! Server lifecycle supervision with stale-completion protection.

use crate::{
    ENDPOINT_HOST, LaunchError, LogBridge, NotifyLevel, OutputSink, PortChecker, ServerHandle,
    ServerLauncher, ServerStatus, SettingsProvider, StartOutcome, SupervisorError,
    SupervisorResult, UiAction, UiNotifier, usage_viewer_url,
};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::watch;

const DEFAULT_STARTING_HINT_DELAY: Duration = Duration::from_secs(10);

const STATUS_STOPPED: &str = "Copilot API: Stopped";
const STATUS_STARTING: &str = "Copilot API: Starting...";
const STATUS_STARTING_HINT: &str = "Copilot API: Starting... (see Output)";
const STATUS_STOPPING: &str = "Copilot API: Stopping...";

const MSG_ALREADY_RUNNING: &str = "Copilot API server is already running.";
const MSG_STILL_STOPPING: &str = "Copilot API server is still stopping. Try again shortly.";
const MSG_NOT_RUNNING: &str = "Copilot API server is not running.";

struct SupervisorState {
    status: ServerStatus,
    /// Bumped by every stop and every start attempt past validation.
    token: u64,
    handle: Option<Box<dyn ServerHandle>>,
    endpoint: Option<String>,
    port: Option<u16>,
    bridge: Option<LogBridge>,
}

/// Owns the one embedded server and serializes its lifecycle.
///
/// State lives behind a mutex that is never held across an await. Every
/// suspending call (port check, server start, server close) is followed by
/// a token comparison, so a start that is overtaken by `stop` or `restart`
/// discards its own server instead of publishing it.
pub struct Supervisor {
    launcher: Arc<dyn ServerLauncher>,
    settings: Arc<dyn SettingsProvider>,
    ui: Arc<dyn UiNotifier>,
    output: Arc<dyn OutputSink>,
    starting_hint_delay: Duration,
    state: Arc<Mutex<SupervisorState>>,
    status_tx: watch::Sender<ServerStatus>,
}

impl Supervisor {
    /// Create a stopped supervisor and publish the initial status text.
    pub fn new(
        launcher: Arc<dyn ServerLauncher>,
        settings: Arc<dyn SettingsProvider>,
        ui: Arc<dyn UiNotifier>,
        output: Arc<dyn OutputSink>,
    ) -> Self {
        let (status_tx, _) = watch::channel(ServerStatus::Stopped);

        ui.set_status_text(STATUS_STOPPED, Some(UiAction::Start));

        Self {
            launcher,
            settings,
            ui,
            output,
            starting_hint_delay: DEFAULT_STARTING_HINT_DELAY,
            state: Arc::new(Mutex::new(SupervisorState {
                status: ServerStatus::Stopped,
                token: 0,
                handle: None,
                endpoint: None,
                port: None,
                bridge: None,
            })),
            status_tx,
        }
    }

    /// Delay before the "still starting" hint replaces the status text.
    pub fn with_starting_hint_delay(mut self, delay: Duration) -> Self {
        self.starting_hint_delay = delay;
        self
    }

    /// Start the server if none is running or starting.
    ///
    /// # Panics
    ///
    /// Panics if polled outside a tokio runtime, since the starting hint is
    /// scheduled with `tokio::spawn`.
    pub async fn start(&self) -> SupervisorResult<StartOutcome> {
        match self.status() {
            ServerStatus::Starting | ServerStatus::Running => {
                self.ui.notify(NotifyLevel::Info, MSG_ALREADY_RUNNING);
                return Ok(StartOutcome::AlreadyRunning);
            }
            ServerStatus::Stopping => {
                self.ui.notify(NotifyLevel::Info, MSG_STILL_STOPPING);
                return Ok(StartOutcome::Stopping);
            }
            ServerStatus::Stopped => {}
        }

        let config = self.settings.snapshot();
        let Some(port) = config.bind_port() else {
            let error = SupervisorError::invalid_config(config.port);
            self.ui.notify(NotifyLevel::Error, &error.user_message());
            return Err(error);
        };

        let bridge = LogBridge::new(Arc::clone(&self.output));
        let my_token = {
            let mut state = self.lock();
            // Re-check under the lock: the status read above is a snapshot.
            if state.status != ServerStatus::Stopped {
                drop(state);
                self.ui.notify(NotifyLevel::Info, MSG_ALREADY_RUNNING);
                return Ok(StartOutcome::AlreadyRunning);
            }
            state.token += 1;
            state.bridge = Some(bridge.clone());
            self.transition(&mut state, ServerStatus::Starting);
            state.token
        };
        self.schedule_starting_hint(my_token);

        if !PortChecker::is_available(port).await {
            return self.fail_start(my_token, &bridge, SupervisorError::port_unavailable(port));
        }
        if !self.is_current(my_token) {
            bridge.detach();
            debug!("Start attempt {my_token} superseded during port check");
            return Ok(StartOutcome::Superseded);
        }

        info!("Starting server on port {port} (attempt {my_token})");
        let result = self.launcher.start(config, bridge.clone()).await;

        match result {
            Ok(handle) => match self.adopt(my_token, handle, port) {
                Ok(endpoint) => {
                    self.output.append_line(&format!("[server] Ready: {endpoint}"));
                    info!("Server running at {endpoint}");
                    Ok(StartOutcome::Started { endpoint })
                }
                Err(stale) => {
                    bridge.detach();
                    debug!("Discarding server from superseded start attempt {my_token}");
                    if let Err(e) = stale.close(true).await {
                        warn!("Failed to close superseded server: {e}");
                    }
                    Ok(StartOutcome::Superseded)
                }
            },
            Err(LaunchError::PortInUse { port }) => {
                self.fail_start(my_token, &bridge, SupervisorError::port_unavailable(port))
            }
            Err(LaunchError::Failed { message, trace }) => self.fail_start(
                my_token,
                &bridge,
                SupervisorError::start_failure(message, trace),
            ),
        }
    }

    /// Stop the server. Safe to call in any state; never fails.
    pub async fn stop(&self) {
        let handle = {
            let mut state = self.lock();
            state.token += 1;

            if state.status == ServerStatus::Stopping {
                return;
            }

            match state.handle.take() {
                Some(handle) => {
                    self.transition(&mut state, ServerStatus::Stopping);
                    handle
                }
                None => {
                    self.finish_stopped(&mut state);
                    return;
                }
            }
        };

        if let Err(e) = handle.close(true).await {
            let error = SupervisorError::close_failure(e.message);
            warn!("{error}");
            self.output
                .append_line(&format!("[stop] {}", error.user_message()));
        }

        {
            let mut state = self.lock();
            self.finish_stopped(&mut state);
        }
        info!("Server stopped");
    }

    /// Stop, then start with a fresh settings snapshot.
    pub async fn restart(&self) -> SupervisorResult<StartOutcome> {
        self.stop().await;
        self.start().await
    }

    /// Unconditional stop for process teardown.
    pub async fn shutdown(&self) {
        info!("Shutting down supervisor");
        self.stop().await;
    }

    pub fn status(&self) -> ServerStatus {
        self.lock().status
    }

    /// `http://localhost:<port>` while running, otherwise `None`.
    pub fn endpoint(&self) -> Option<String> {
        self.lock().endpoint.clone()
    }

    /// Current lifecycle token.
    pub fn token(&self) -> u64 {
        self.lock().token
    }

    pub fn subscribe(&self) -> watch::Receiver<ServerStatus> {
        self.status_tx.subscribe()
    }

    /// Return the endpoint for copying, or warn that nothing is running.
    pub fn copy_endpoint(&self) -> Option<String> {
        match self.endpoint() {
            Some(endpoint) => {
                self.ui
                    .notify(NotifyLevel::Info, &format!("Copied endpoint: {endpoint}"));
                Some(endpoint)
            }
            None => {
                self.ui.notify(NotifyLevel::Warning, MSG_NOT_RUNNING);
                None
            }
        }
    }

    /// Usage dashboard link for the running server, or warn that nothing is running.
    pub fn usage_viewer_url(&self) -> Option<String> {
        match self.endpoint() {
            Some(endpoint) => Some(usage_viewer_url(&endpoint)),
            None => {
                self.ui.notify(NotifyLevel::Warning, MSG_NOT_RUNNING);
                None
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, SupervisorState> {
        lock_state(&self.state)
    }

    fn is_current(&self, token: u64) -> bool {
        self.lock().token == token
    }

    /// Set the status and publish it. The status text is pushed while the
    /// state is locked so concurrent transitions cannot reorder it.
    fn transition(&self, state: &mut SupervisorState, status: ServerStatus) {
        state.status = status;
        self.status_tx.send_replace(status);

        match status {
            ServerStatus::Stopped => {
                self.ui.set_status_text(STATUS_STOPPED, Some(UiAction::Start))
            }
            ServerStatus::Starting => self.ui.set_status_text(STATUS_STARTING, None),
            ServerStatus::Running => {
                let text = format!("Copilot API: Running ({})", state.port.unwrap_or_default());
                self.ui.set_status_text(&text, Some(UiAction::Stop));
            }
            ServerStatus::Stopping => self.ui.set_status_text(STATUS_STOPPING, None),
        }
    }

    fn finish_stopped(&self, state: &mut SupervisorState) {
        if let Some(bridge) = state.bridge.take() {
            bridge.detach();
        }
        state.handle = None;
        state.endpoint = None;
        state.port = None;
        self.transition(state, ServerStatus::Stopped);
    }

    /// Publish `handle` if `token` still owns the lifecycle; otherwise hand it back.
    fn adopt(
        &self,
        token: u64,
        handle: Box<dyn ServerHandle>,
        port: u16,
    ) -> Result<String, Box<dyn ServerHandle>> {
        let mut state = self.lock();
        if state.token != token {
            return Err(handle);
        }

        let endpoint = format!("http://{ENDPOINT_HOST}:{port}");
        state.handle = Some(handle);
        state.endpoint = Some(endpoint.clone());
        state.port = Some(port);
        self.transition(&mut state, ServerStatus::Running);
        Ok(endpoint)
    }

    /// Roll a failed attempt back to Stopped and report it, unless superseded.
    fn fail_start(
        &self,
        token: u64,
        bridge: &LogBridge,
        error: SupervisorError,
    ) -> SupervisorResult<StartOutcome> {
        bridge.detach();

        {
            let mut state = self.lock();
            if state.token != token {
                debug!("Ignoring failure of superseded start attempt {token}: {error}");
                return Ok(StartOutcome::Superseded);
            }
            self.finish_stopped(&mut state);
        }

        warn!("{error}");
        if let SupervisorError::ServerStartFailure { message, trace, .. } = &error {
            self.output.append_line(&format!("[server] Error: {message}"));
            if let Some(trace) = trace {
                for line in trace.lines() {
                    self.output.append_line(line);
                }
            }
        }
        self.output
            .append_line(&format!("[server] Hint: {}", error.recovery_hint()));
        self.ui.notify(NotifyLevel::Error, &error.user_message());

        Err(error)
    }

    /// Show a hint if this attempt is still starting after the delay.
    fn schedule_starting_hint(&self, token: u64) {
        let state = Arc::clone(&self.state);
        let ui = Arc::clone(&self.ui);
        let delay = self.starting_hint_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let guard = lock_state(&state);
            if guard.token == token && guard.status == ServerStatus::Starting {
                ui.set_status_text(STATUS_STARTING_HINT, None);
            }
        });
    }
}

fn lock_state(state: &Mutex<SupervisorState>) -> MutexGuard<'_, SupervisorState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
