//! Per-socket client handle.
//!
//! A [`ClientConnection`] is only an outbound queue plus liveness
//! bookkeeping. Which room (if any) the connection is attached to lives
//! exclusively in the registry, so membership changes never race against
//! connection state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Handle for one connected WebSocket client.
pub struct ClientConnection {
    /// Unique connection ID (`conn_` prefixed).
    pub id: String,
    outbound: mpsc::Sender<Arc<String>>,
    opened_at: Instant,
    pong_at: Mutex<Instant>,
    dropped: AtomicU64,
}

impl ClientConnection {
    pub fn new(id: String, outbound: mpsc::Sender<Arc<String>>) -> Self {
        let now = Instant::now();
        Self {
            id,
            outbound,
            opened_at: now,
            pong_at: Mutex::new(now),
            dropped: AtomicU64::new(0),
        }
    }

    /// Queue a serialized event for the client's writer task.
    ///
    /// A full or closed queue drops the message (counted) rather than
    /// blocking the room.
    pub fn enqueue(&self, message: Arc<String>) -> bool {
        match self.outbound.try_send(message) {
            Ok(()) => true,
            Err(_) => {
                let _ = self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// How many messages this connection has dropped so far.
    pub fn dropped_total(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Record inbound activity, pushing the liveness deadline forward.
    pub fn record_pong(&self) {
        *self.pong_at.lock() = Instant::now();
    }

    /// Time since the last inbound frame (or since the socket opened).
    pub fn idle_for(&self) -> Duration {
        self.pong_at.lock().elapsed()
    }

    /// How long the socket has been open.
    pub fn uptime(&self) -> Duration {
        self.opened_at.elapsed()
    }
}
