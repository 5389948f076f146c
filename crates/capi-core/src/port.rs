//! Port availability checking.

use crate::LOOPBACK_HOST;

use log::debug;
use tokio::net::TcpListener;

pub struct PortChecker;

impl PortChecker {
    /// Check if a port is available for binding on loopback.
    ///
    /// Binds a transient listener to 127.0.0.1:port and drops it before
    /// returning, so no socket outlives the check. Any bind error counts as
    /// unavailable. The answer can be stale by the time the real server
    /// binds; that failure surfaces from the launcher instead.
    ///
    /// Port 0 asks the OS for an ephemeral port and therefore always
    /// succeeds; callers validate the range first.
    pub async fn is_available(port: u16) -> bool {
        match TcpListener::bind((LOOPBACK_HOST, port)).await {
            Ok(listener) => {
                drop(listener);
                true
            }
            Err(e) => {
                debug!("Port {port} unavailable: {e}");
                false
            }
        }
    }
}
