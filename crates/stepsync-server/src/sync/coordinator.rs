//! Room session semantics — join, leave, syncAction, disconnect.
//!
//! The coordinator is the only component that touches both the registry
//! and the broadcaster. It is constructed explicitly and injected into
//! the socket loop; there is no global server state.

use std::sync::Arc;

use stepsync_core::protocol::{NOT_IN_ROOM, Participant, ServerEvent, now_ms};
use tracing::{debug, info, warn};

use super::broadcast::RoomBroadcaster;
use super::connection::ClientConnection;
use super::registry::{AttachOutcome, ConnectionRegistry};

/// Applies protocol semantics on top of registry and broadcaster.
pub struct SessionCoordinator {
    registry: Arc<ConnectionRegistry>,
    broadcaster: RoomBroadcaster,
}

impl SessionCoordinator {
    /// Build a coordinator over shared registry state.
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        let broadcaster = RoomBroadcaster::new(registry.clone());
        Self {
            registry,
            broadcaster,
        }
    }

    /// The underlying registry (for health counters).
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Admit a new connection with no room association.
    pub async fn register(&self, conn: Arc<ClientConnection>) {
        self.registry.register(conn).await;
    }

    /// Handle a `join`: attach and announce.
    ///
    /// Joining while attached to another room performs an implicit leave:
    /// the old room hears `userLeft` before the new room hears
    /// `userJoined`. Re-joining the same room under the same participant
    /// is a silent no-op.
    pub async fn handle_join(
        &self,
        conn: &Arc<ClientConnection>,
        room_id: &str,
        participant: Participant,
    ) {
        let announced = participant.clone();
        let Some(outcome) = self.registry.attach(&conn.id, room_id, participant).await else {
            warn!(conn_id = %conn.id, room_id, "join from unregistered connection");
            return;
        };

        match outcome {
            AttachOutcome::Unchanged => {
                debug!(conn_id = %conn.id, room_id, "re-join ignored");
            }
            AttachOutcome::Moved { prior } => {
                info!(
                    conn_id = %conn.id,
                    from = %prior.room_id,
                    to = room_id,
                    "connection moved rooms (implicit leave)"
                );
                // Excluding the mover matters when the "move" is an
                // identity change within the same room: the connection is
                // already re-attached and must not hear its own departure.
                self.broadcaster
                    .broadcast_to_others(
                        &prior.room_id,
                        &conn.id,
                        &ServerEvent::UserLeft {
                            room_id: prior.room_id.clone(),
                            participant_id: prior.participant.participant_id,
                        },
                    )
                    .await;
                self.announce_join(conn, room_id, announced).await;
            }
            AttachOutcome::Joined => {
                self.announce_join(conn, room_id, announced).await;
            }
        }
    }

    async fn announce_join(
        &self,
        conn: &Arc<ClientConnection>,
        room_id: &str,
        participant: Participant,
    ) {
        info!(conn_id = %conn.id, room_id, participant_id = %participant.participant_id, "participant joined room");
        self.broadcaster
            .broadcast_to_others(
                room_id,
                &conn.id,
                &ServerEvent::UserJoined {
                    room_id: room_id.to_owned(),
                    participant,
                },
            )
            .await;
    }

    /// Handle a `leave`: detach and announce to the remaining members.
    ///
    /// Leaving a room the connection is not attached to earns a
    /// `NOT_IN_ROOM` acknowledgment; nothing is broadcast.
    pub async fn handle_leave(&self, conn: &Arc<ClientConnection>, room_id: &str) {
        if !self.attached_to(&conn.id, room_id).await {
            self.ack_error(conn, room_id);
            return;
        }

        let Some(prior) = self.registry.detach(&conn.id).await else {
            self.ack_error(conn, room_id);
            return;
        };

        info!(conn_id = %conn.id, room_id, "participant left room");
        self.broadcaster
            .broadcast_to_room(
                room_id,
                &ServerEvent::UserLeft {
                    room_id: room_id.to_owned(),
                    participant_id: prior.participant.participant_id,
                },
            )
            .await;
    }

    /// Handle a `syncAction`: stamp and echo to the whole room.
    ///
    /// The originator receives the echo too, so every member applies the
    /// action at the same server-assigned time. Actions from connections
    /// not attached to the named room earn `NOT_IN_ROOM`.
    pub async fn handle_sync_action(
        &self,
        conn: &Arc<ClientConnection>,
        room_id: &str,
        action: String,
    ) {
        if !self.attached_to(&conn.id, room_id).await {
            self.ack_error(conn, room_id);
            return;
        }

        let seq = self.registry.next_action_seq(room_id).await;
        let event = ServerEvent::SyncAction {
            room_id: room_id.to_owned(),
            action,
            timestamp: now_ms(),
            seq,
        };
        self.broadcaster.broadcast_to_room(room_id, &event).await;
    }

    /// Handle channel close: remove the connection, and if it was in a
    /// room announce the departure exactly as an explicit leave would.
    pub async fn handle_disconnect(&self, conn_id: &str) {
        let Some(prior) = self.registry.remove(conn_id).await else {
            return;
        };

        info!(conn_id, room_id = %prior.room_id, "disconnected while in room");
        self.broadcaster
            .broadcast_to_room(
                &prior.room_id,
                &ServerEvent::UserLeft {
                    room_id: prior.room_id.clone(),
                    participant_id: prior.participant.participant_id,
                },
            )
            .await;
    }

    async fn attached_to(&self, conn_id: &str, room_id: &str) -> bool {
        self.registry
            .attachment_of(conn_id)
            .await
            .is_some_and(|att| att.room_id == room_id)
    }

    /// Error acknowledgments go only to the offending sender.
    fn ack_error(&self, conn: &Arc<ClientConnection>, room_id: &str) {
        let event =
            ServerEvent::protocol_error(NOT_IN_ROOM, format!("not attached to {room_id}"));
        if let Ok(json) = serde_json::to_string(&event) {
            let _ = conn.enqueue(Arc::new(json));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tokio::sync::mpsc;

    struct Client {
        conn: Arc<ClientConnection>,
        rx: mpsc::Receiver<Arc<String>>,
    }

    impl Client {
        fn drain(&mut self) -> Vec<Value> {
            let mut events = Vec::new();
            while let Ok(msg) = self.rx.try_recv() {
                events.push(serde_json::from_str(&msg).unwrap());
            }
            events
        }
    }

    async fn client(coordinator: &SessionCoordinator, id: &str) -> Client {
        let (tx, rx) = mpsc::channel(32);
        let conn = Arc::new(ClientConnection::new(id.into(), tx));
        coordinator.register(conn.clone()).await;
        Client { conn, rx }
    }

    fn coordinator() -> SessionCoordinator {
        SessionCoordinator::new(Arc::new(ConnectionRegistry::new()))
    }

    #[tokio::test]
    async fn join_announces_to_others_not_joiner() {
        let coord = coordinator();
        let mut a = client(&coord, "ca").await;
        let mut b = client(&coord, "cb").await;

        coord
            .handle_join(&a.conn, "sess-1", Participant::new("alice"))
            .await;
        coord
            .handle_join(&b.conn, "sess-1", Participant::new("bob"))
            .await;

        // Alice hears about Bob, but not about herself
        let a_events = a.drain();
        assert_eq!(a_events.len(), 1);
        assert_eq!(a_events[0]["type"], "userJoined");
        assert_eq!(a_events[0]["participant"]["participantId"], "bob");

        // Bob joined last; nobody to announce to him
        assert!(b.drain().is_empty());
    }

    #[tokio::test]
    async fn rejoin_same_room_is_silent() {
        let coord = coordinator();
        let mut a = client(&coord, "ca").await;
        let mut b = client(&coord, "cb").await;
        coord
            .handle_join(&a.conn, "sess-1", Participant::new("alice"))
            .await;
        coord
            .handle_join(&b.conn, "sess-1", Participant::new("bob"))
            .await;
        let _ = a.drain();

        coord
            .handle_join(&b.conn, "sess-1", Participant::new("bob"))
            .await;
        assert!(a.drain().is_empty());
        assert!(b.drain().is_empty());
    }

    #[tokio::test]
    async fn join_while_attached_elsewhere_leaves_first() {
        let coord = coordinator();
        let mut a = client(&coord, "ca").await;
        let mut b = client(&coord, "cb").await;
        let mut c = client(&coord, "cc").await;

        coord
            .handle_join(&a.conn, "sess-1", Participant::new("alice"))
            .await;
        coord
            .handle_join(&b.conn, "sess-2", Participant::new("bob"))
            .await;
        coord
            .handle_join(&c.conn, "sess-1", Participant::new("cleo"))
            .await;
        let _ = a.drain();

        // Cleo hops from sess-1 to sess-2
        coord
            .handle_join(&c.conn, "sess-2", Participant::new("cleo"))
            .await;

        // sess-1 hears the departure
        let a_events = a.drain();
        assert_eq!(a_events.len(), 1);
        assert_eq!(a_events[0]["type"], "userLeft");
        assert_eq!(a_events[0]["roomId"], "sess-1");
        assert_eq!(a_events[0]["participantId"], "cleo");

        // sess-2 hears the arrival
        let b_events = b.drain();
        assert_eq!(b_events.len(), 1);
        assert_eq!(b_events[0]["type"], "userJoined");
        assert_eq!(b_events[0]["roomId"], "sess-2");
    }

    #[tokio::test]
    async fn identity_change_in_same_room_reannounces_to_others_only() {
        let coord = coordinator();
        let mut a = client(&coord, "ca").await;
        let mut b = client(&coord, "cb").await;
        coord
            .handle_join(&a.conn, "sess-1", Participant::new("alice"))
            .await;
        coord
            .handle_join(&b.conn, "sess-1", Participant::new("bob"))
            .await;
        let _ = a.drain();

        // Same connection, same room, new participant identity
        coord
            .handle_join(&a.conn, "sess-1", Participant::new("alicia"))
            .await;

        // Bob sees the old identity leave and the new one arrive
        let b_events = b.drain();
        assert_eq!(b_events.len(), 2);
        assert_eq!(b_events[0]["type"], "userLeft");
        assert_eq!(b_events[0]["participantId"], "alice");
        assert_eq!(b_events[1]["type"], "userJoined");
        assert_eq!(b_events[1]["participant"]["participantId"], "alicia");

        // The renaming connection hears nothing about itself
        assert!(a.drain().is_empty());
        assert!(
            coord
                .registry()
                .attachment_of("ca")
                .await
                .is_some_and(|att| att.participant.participant_id == "alicia")
        );
    }

    #[tokio::test]
    async fn leave_announces_to_remaining() {
        let coord = coordinator();
        let mut a = client(&coord, "ca").await;
        let mut b = client(&coord, "cb").await;
        coord
            .handle_join(&a.conn, "sess-1", Participant::new("alice"))
            .await;
        coord
            .handle_join(&b.conn, "sess-1", Participant::new("bob"))
            .await;
        let _ = a.drain();

        coord.handle_leave(&b.conn, "sess-1").await;

        let a_events = a.drain();
        assert_eq!(a_events.len(), 1);
        assert_eq!(a_events[0]["type"], "userLeft");
        assert_eq!(a_events[0]["participantId"], "bob");
        // The leaver receives nothing
        assert!(b.drain().is_empty());
    }

    #[tokio::test]
    async fn leave_without_membership_acks_not_in_room() {
        let coord = coordinator();
        let mut a = client(&coord, "ca").await;

        coord.handle_leave(&a.conn, "sess-1").await;

        let events = a.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["type"], "protocolError");
        assert_eq!(events[0]["code"], "NOT_IN_ROOM");
    }

    #[tokio::test]
    async fn leave_wrong_room_acks_not_in_room() {
        let coord = coordinator();
        let mut a = client(&coord, "ca").await;
        coord
            .handle_join(&a.conn, "sess-1", Participant::new("alice"))
            .await;

        coord.handle_leave(&a.conn, "sess-other").await;

        let events = a.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["code"], "NOT_IN_ROOM");
        // Still attached to sess-1
        assert!(
            coord
                .registry()
                .attachment_of("ca")
                .await
                .is_some_and(|att| att.room_id == "sess-1")
        );
    }

    #[tokio::test]
    async fn sync_action_reaches_all_including_sender() {
        let coord = coordinator();
        let mut a = client(&coord, "ca").await;
        let mut b = client(&coord, "cb").await;
        coord
            .handle_join(&a.conn, "sess-1", Participant::new("alice"))
            .await;
        coord
            .handle_join(&b.conn, "sess-1", Participant::new("bob"))
            .await;
        let _ = a.drain();

        coord
            .handle_sync_action(&a.conn, "sess-1", "beat-drop".into())
            .await;

        let a_events = a.drain();
        let b_events = b.drain();
        assert_eq!(a_events.len(), 1);
        assert_eq!(b_events.len(), 1);
        assert_eq!(a_events[0]["type"], "syncAction");
        assert_eq!(a_events[0]["action"], "beat-drop");
        // One shared server-stamped apply time and seq
        assert_eq!(a_events[0]["timestamp"], b_events[0]["timestamp"]);
        assert_eq!(a_events[0]["seq"], b_events[0]["seq"]);
        assert_eq!(a_events[0]["seq"], 1);
    }

    #[tokio::test]
    async fn sync_action_without_membership_acks_not_in_room() {
        let coord = coordinator();
        let mut a = client(&coord, "ca").await;

        coord
            .handle_sync_action(&a.conn, "sess-1", "beat-drop".into())
            .await;

        let events = a.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["type"], "protocolError");
        assert_eq!(events[0]["code"], "NOT_IN_ROOM");
    }

    #[tokio::test]
    async fn seq_increments_across_actions() {
        let coord = coordinator();
        let mut a = client(&coord, "ca").await;
        coord
            .handle_join(&a.conn, "sess-1", Participant::new("alice"))
            .await;

        coord
            .handle_sync_action(&a.conn, "sess-1", "start".into())
            .await;
        coord
            .handle_sync_action(&a.conn, "sess-1", "stop".into())
            .await;

        let events = a.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["seq"], 1);
        assert_eq!(events[1]["seq"], 2);
    }

    #[tokio::test]
    async fn disconnect_equals_leave() {
        let coord = coordinator();
        let mut a = client(&coord, "ca").await;
        let b = client(&coord, "cb").await;
        coord
            .handle_join(&a.conn, "sess-1", Participant::new("alice"))
            .await;
        coord
            .handle_join(&b.conn, "sess-1", Participant::new("bob"))
            .await;
        let _ = a.drain();

        coord.handle_disconnect("cb").await;

        let a_events = a.drain();
        assert_eq!(a_events.len(), 1);
        assert_eq!(a_events[0]["type"], "userLeft");
        assert_eq!(a_events[0]["participantId"], "bob");
        assert_eq!(coord.registry().connection_count().await, 1);
    }

    #[tokio::test]
    async fn disconnect_without_attach_is_silent() {
        let coord = coordinator();
        let mut a = client(&coord, "ca").await;
        let _b = client(&coord, "cb").await;
        coord
            .handle_join(&a.conn, "sess-1", Participant::new("alice"))
            .await;

        coord.handle_disconnect("cb").await;
        assert!(a.drain().is_empty());
        // Unknown IDs are a no-op too
        coord.handle_disconnect("ghost").await;
    }

    // The original beat-drop walkthrough: A and B practice in sess-1, C
    // sits in sess-2; A drops the beat; only sess-1 applies it.
    #[tokio::test]
    async fn beat_drop_scenario() {
        let coord = coordinator();
        let mut a = client(&coord, "ca").await;
        let mut b = client(&coord, "cb").await;
        let mut c = client(&coord, "cc").await;

        coord
            .handle_join(&a.conn, "sess-1", Participant::new("alice"))
            .await;
        coord
            .handle_join(&b.conn, "sess-1", Participant::new("bob"))
            .await;
        coord
            .handle_join(&c.conn, "sess-2", Participant::new("cleo"))
            .await;
        let _ = a.drain();

        coord
            .handle_sync_action(&a.conn, "sess-1", "beat-drop".into())
            .await;

        assert_eq!(a.drain().len(), 1);
        assert_eq!(b.drain().len(), 1);
        assert!(c.drain().is_empty());
    }
}
