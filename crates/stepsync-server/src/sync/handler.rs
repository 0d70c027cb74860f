//! Inbound frame parsing and dispatch.
//!
//! Frames must parse into the closed [`ClientMessage`] set; anything else
//! is answered with an `INVALID_MESSAGE` acknowledgment to the sender and
//! the channel stays open.

use std::sync::Arc;

use stepsync_core::protocol::{ClientMessage, INVALID_MESSAGE, ServerEvent};
use tracing::{debug, warn};

use super::connection::ClientConnection;
use super::coordinator::SessionCoordinator;

/// Parse one text frame and apply it through the coordinator.
pub async fn handle_frame(
    text: &str,
    conn: &Arc<ClientConnection>,
    coordinator: &SessionCoordinator,
) {
    let message: ClientMessage = match serde_json::from_str(text) {
        Ok(m) => m,
        Err(e) => {
            warn!(conn_id = %conn.id, "unparseable frame");
            let ack =
                ServerEvent::protocol_error(INVALID_MESSAGE, format!("invalid message: {e}"));
            if let Ok(json) = serde_json::to_string(&ack) {
                let _ = conn.enqueue(Arc::new(json));
            }
            return;
        }
    };

    match message {
        ClientMessage::Join {
            room_id,
            participant,
        } => {
            debug!(conn_id = %conn.id, room_id, "dispatching join");
            coordinator.handle_join(conn, &room_id, participant).await;
        }
        ClientMessage::Leave { room_id, .. } => {
            debug!(conn_id = %conn.id, room_id, "dispatching leave");
            coordinator.handle_leave(conn, &room_id).await;
        }
        ClientMessage::SyncAction { room_id, action } => {
            debug!(conn_id = %conn.id, room_id, action, "dispatching syncAction");
            coordinator.handle_sync_action(conn, &room_id, action).await;
        }
    }
}
