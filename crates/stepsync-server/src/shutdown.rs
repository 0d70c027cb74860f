//! Cooperative shutdown signalling.
//!
//! One root [`CancellationToken`] fans out to the serve loop and every
//! socket session; sessions additionally derive child tokens so a single
//! connection can be torn down without touching the rest.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const DRAIN_DEADLINE: Duration = Duration::from_secs(30);

/// Owner of the root cancellation token.
pub struct ShutdownCoordinator {
    root: CancellationToken,
}

impl ShutdownCoordinator {
    /// A coordinator whose token has not fired.
    pub fn new() -> Self {
        Self {
            root: CancellationToken::new(),
        }
    }

    /// Clone of the root token, for tasks that should stop on shutdown.
    pub fn token(&self) -> CancellationToken {
        self.root.clone()
    }

    /// Fire the root token. Safe to call more than once.
    pub fn shutdown(&self) {
        self.root.cancel();
    }

    /// True once [`shutdown`](Self::shutdown) has been called.
    pub fn is_shutting_down(&self) -> bool {
        self.root.is_cancelled()
    }

    /// Fire the token and wait for `handles` to drain.
    ///
    /// Returns `true` if every task finished before the deadline
    /// (`DRAIN_DEADLINE` unless overridden).
    pub async fn graceful_shutdown<T>(
        &self,
        handles: Vec<JoinHandle<T>>,
        deadline: Option<Duration>,
    ) -> bool {
        let deadline = deadline.unwrap_or(DRAIN_DEADLINE);
        self.shutdown();
        info!(tasks = handles.len(), ?deadline, "draining tasks");

        let drained = tokio::time::timeout(deadline, futures::future::join_all(handles))
            .await
            .is_ok();
        if !drained {
            warn!(?deadline, "tasks still running at drain deadline");
        }
        drained
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
