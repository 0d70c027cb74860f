//! Room membership state — the single source of truth.
//!
//! Every membership fact lives behind one async `RwLock`: which connections
//! exist, which room each is attached to (at most one), and which
//! connections make up each room. Each public operation is a single
//! critical section, so concurrent connection tasks always observe a
//! consistent membership picture.
//!
//! Rooms are created implicitly by the first attach and reclaimed the
//! moment the last member detaches.

use std::collections::HashMap;
use std::sync::Arc;

use stepsync_core::protocol::Participant;
use tokio::sync::RwLock;
use tracing::debug;

use super::connection::ClientConnection;

/// A connection's room association.
#[derive(Clone, Debug)]
pub struct Attachment {
    /// Room the connection is a member of.
    pub room_id: String,
    /// Identity asserted at join time.
    pub participant: Participant,
}

/// Result of an attach call.
#[derive(Clone, Debug)]
pub enum AttachOutcome {
    /// The connection joined the room fresh.
    Joined,
    /// Identical room and participant as the current attachment; nothing
    /// changed and nothing should be announced.
    Unchanged,
    /// The connection was attached elsewhere (or under another identity)
    /// and has been moved; the prior attachment is returned so the caller
    /// can announce the departure.
    Moved {
        /// The attachment that was displaced.
        prior: Attachment,
    },
}

struct ConnectionEntry {
    conn: Arc<ClientConnection>,
    attachment: Option<Attachment>,
}

#[derive(Default)]
struct RoomState {
    /// Member connection IDs.
    members: Vec<String>,
    /// Next syncAction sequence number for this room.
    next_seq: u64,
}

#[derive(Default)]
struct RegistryInner {
    connections: HashMap<String, ConnectionEntry>,
    rooms: HashMap<String, RoomState>,
}

impl RegistryInner {
    fn detach_locked(&mut self, conn_id: &str) -> Option<Attachment> {
        let entry = self.connections.get_mut(conn_id)?;
        let attachment = entry.attachment.take()?;
        if let Some(room) = self.rooms.get_mut(&attachment.room_id) {
            room.members.retain(|id| id != conn_id);
            if room.members.is_empty() {
                let _ = self.rooms.remove(&attachment.room_id);
            }
        }
        Some(attachment)
    }
}

/// Tracks all live connections and their room memberships.
pub struct ConnectionRegistry {
    inner: RwLock<RegistryInner>,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(RegistryInner::default()),
        }
    }

    /// Admit a connection with no room association.
    pub async fn register(&self, conn: Arc<ClientConnection>) {
        let mut inner = self.inner.write().await;
        let _ = inner.connections.insert(
            conn.id.clone(),
            ConnectionEntry {
                conn,
                attachment: None,
            },
        );
    }

    /// Attach a connection to a room under a participant identity.
    ///
    /// If attached elsewhere the prior association is severed first and
    /// returned via [`AttachOutcome::Moved`]. Re-attaching with the same
    /// room and participant ID is a no-op.
    pub async fn attach(
        &self,
        conn_id: &str,
        room_id: &str,
        participant: Participant,
    ) -> Option<AttachOutcome> {
        let mut inner = self.inner.write().await;
        // Unknown connections cannot attach
        if !inner.connections.contains_key(conn_id) {
            return None;
        }

        let current = inner
            .connections
            .get(conn_id)
            .and_then(|e| e.attachment.clone());
        if let Some(att) = &current {
            if att.room_id == room_id
                && att.participant.participant_id == participant.participant_id
            {
                return Some(AttachOutcome::Unchanged);
            }
        }

        let prior = inner.detach_locked(conn_id);

        let room = inner.rooms.entry(room_id.to_owned()).or_default();
        room.members.push(conn_id.to_owned());
        if let Some(entry) = inner.connections.get_mut(conn_id) {
            entry.attachment = Some(Attachment {
                room_id: room_id.to_owned(),
                participant,
            });
        }
        debug!(conn_id, room_id, "connection attached");

        Some(match prior {
            Some(prior) => AttachOutcome::Moved { prior },
            None => AttachOutcome::Joined,
        })
    }

    /// Remove the connection's room association, returning it if any.
    pub async fn detach(&self, conn_id: &str) -> Option<Attachment> {
        let mut inner = self.inner.write().await;
        inner.detach_locked(conn_id)
    }

    /// Fully remove a connection (implies detach). Returns the prior
    /// association if there was one; no-op on unknown IDs.
    pub async fn remove(&self, conn_id: &str) -> Option<Attachment> {
        let mut inner = self.inner.write().await;
        let attachment = inner.detach_locked(conn_id);
        let _ = inner.connections.remove(conn_id);
        attachment
    }

    /// The connection's current association, if any.
    pub async fn attachment_of(&self, conn_id: &str) -> Option<Attachment> {
        let inner = self.inner.read().await;
        inner
            .connections
            .get(conn_id)
            .and_then(|e| e.attachment.clone())
    }

    /// Snapshot of the room's member connections. Empty for unknown rooms.
    pub async fn members_of(&self, room_id: &str) -> Vec<Arc<ClientConnection>> {
        let inner = self.inner.read().await;
        let Some(room) = inner.rooms.get(room_id) else {
            return Vec::new();
        };
        room.members
            .iter()
            .filter_map(|id| inner.connections.get(id).map(|e| e.conn.clone()))
            .collect()
    }

    /// Next per-room monotonic sequence number, starting at 1. The counter
    /// is reclaimed with the room, so it resets if a room empties out.
    pub async fn next_action_seq(&self, room_id: &str) -> u64 {
        let mut inner = self.inner.write().await;
        match inner.rooms.get_mut(room_id) {
            Some(room) => {
                room.next_seq += 1;
                room.next_seq
            }
            None => 1,
        }
    }

    /// Number of live connections.
    pub async fn connection_count(&self) -> usize {
        self.inner.read().await.connections.len()
    }

    /// Number of rooms with at least one member.
    pub async fn active_room_count(&self) -> usize {
        self.inner.read().await.rooms.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
