//! `/health` endpoint payload.

use serde::Serialize;
use std::time::Instant;

/// Liveness snapshot returned by `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// `"ok"` whenever the process can answer at all.
    pub status: String,
    /// Seconds since boot.
    pub uptime_secs: u64,
    /// Open WebSocket connections.
    pub connections: usize,
    /// Rooms with at least one member.
    pub active_rooms: usize,
}

/// Snapshot the given counters into a response body.
pub fn health_check(start_time: Instant, connections: usize, active_rooms: usize) -> HealthResponse {
    HealthResponse {
        status: "ok".into(),
        uptime_secs: start_time.elapsed().as_secs(),
        connections,
        active_rooms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_carries_counters_and_uptime() {
        let booted_a_minute_ago = Instant::now()
            .checked_sub(std::time::Duration::from_secs(60))
            .unwrap();
        let resp = health_check(booted_a_minute_ago, 5, 2);
        assert_eq!(resp.status, "ok");
        assert_eq!(resp.connections, 5);
        assert_eq!(resp.active_rooms, 2);
        assert!(resp.uptime_secs >= 59);
    }

    #[test]
    fn wire_shape() {
        let parsed = serde_json::to_value(health_check(Instant::now(), 2, 1)).unwrap();
        assert_eq!(parsed["status"], "ok");
        assert_eq!(parsed["connections"], 2);
        assert_eq!(parsed["active_rooms"], 1);
        assert!(parsed["uptime_secs"].is_number());
    }
}
