/// Result of a `start` request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new server is running at `endpoint`.
    Started { endpoint: String },
    /// A server is already running or starting; nothing was done.
    AlreadyRunning,
    /// The previous server is still closing; nothing was done.
    Stopping,
    /// A stop or restart overtook this attempt; its server was discarded.
    Superseded,
}
