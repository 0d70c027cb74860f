//! Event fan-out to room members.
//!
//! The broadcaster reads a membership snapshot from the registry and
//! performs non-blocking sends; it never mutates membership state. A slow
//! or closed client is logged and skipped, so one bad consumer cannot
//! stall the room.

use std::sync::Arc;

use stepsync_core::protocol::ServerEvent;
use tracing::{debug, warn};

use super::registry::ConnectionRegistry;

/// Fans server events out to room members.
pub struct RoomBroadcaster {
    registry: Arc<ConnectionRegistry>,
}

impl RoomBroadcaster {
    /// Create a broadcaster over the given registry.
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Deliver an event to every member of the room, including the
    /// originator. At most one delivery per member per call; connections
    /// joining after the snapshot are not retroactively included.
    pub async fn broadcast_to_room(&self, room_id: &str, event: &ServerEvent) {
        self.fan_out(room_id, None, event).await;
    }

    /// Deliver an event to every member except `exclude_conn_id`.
    pub async fn broadcast_to_others(
        &self,
        room_id: &str,
        exclude_conn_id: &str,
        event: &ServerEvent,
    ) {
        self.fan_out(room_id, Some(exclude_conn_id), event).await;
    }

    async fn fan_out(&self, room_id: &str, exclude: Option<&str>, event: &ServerEvent) {
        let json = match serde_json::to_string(event) {
            Ok(j) => Arc::new(j),
            Err(e) => {
                warn!(event = event.kind(), error = %e, "failed to serialize event");
                return;
            }
        };
        let members = self.registry.members_of(room_id).await;
        debug!(
            event = event.kind(),
            room_id,
            recipients = members.len(),
            "broadcast event to room"
        );
        for conn in &members {
            if exclude == Some(conn.id.as_str()) {
                continue;
            }
            if !conn.enqueue(json.clone()) {
                warn!(conn_id = %conn.id, room_id, "failed to send event to client");
            }
        }
    }
}
