//! Pong-deadline liveness watchdog.

use std::sync::Arc;
use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;

use super::connection::ClientConnection;

/// Why the watchdog stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeartbeatResult {
    /// No pong arrived within the timeout window.
    TimedOut,
    /// The watchdog was cancelled externally.
    Cancelled,
}

/// Watch a connection's pong clock until it goes stale or `cancel` fires.
///
/// The ping frames themselves are sent by the session's outbound task; this
/// loop only wakes every `interval` and compares the time since the last
/// inbound frame against `timeout`.
pub async fn run_heartbeat(
    connection: Arc<ClientConnection>,
    interval: Duration,
    timeout: Duration,
    cancel: CancellationToken,
) -> HeartbeatResult {
    let mut ticker = time::interval(interval);
    // Immediate first tick would report a fresh connection as stale-adjacent
    // noise; skip it.
    ticker.tick().await;

    loop {
        tokio::select! {
            () = cancel.cancelled() => return HeartbeatResult::Cancelled,
            _ = ticker.tick() => {
                if connection.idle_for() >= timeout {
                    return HeartbeatResult::TimedOut;
                }
            }
        }
    }
}
