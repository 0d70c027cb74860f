//! Sync-protocol wire types.
//!
//! The message set is closed: inbound frames must parse into one of the
//! [`ClientMessage`] variants, and anything else is answered with a
//! `protocolError` acknowledgment rather than passed through untyped.
//! All field names are camelCase on the wire.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Protocol error codes ────────────────────────────────────────────

/// Frame could not be parsed as a known message kind.
pub const INVALID_MESSAGE: &str = "INVALID_MESSAGE";
/// `leave` or `syncAction` for a room the connection is not attached to.
pub const NOT_IN_ROOM: &str = "NOT_IN_ROOM";

/// Caller-asserted identity attached to a connection within a room.
///
/// The profile is an arbitrary JSON payload supplied by the client; this
/// layer never validates it against the user store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Caller-supplied participant identifier.
    pub participant_id: String,
    /// Arbitrary caller-supplied profile payload.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub profile: Value,
}

impl Participant {
    /// Create a participant with an empty profile.
    pub fn new(participant_id: impl Into<String>) -> Self {
        Self {
            participant_id: participant_id.into(),
            profile: Value::Null,
        }
    }

    /// Attach a profile payload.
    #[must_use]
    pub fn with_profile(mut self, profile: Value) -> Self {
        self.profile = profile;
        self
    }
}

/// Inbound message from a client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Join a room under the given participant identity.
    #[serde(rename_all = "camelCase")]
    Join {
        /// Target room (a practice-session ID).
        room_id: String,
        /// Identity to attach.
        participant: Participant,
    },
    /// Leave the named room.
    #[serde(rename_all = "camelCase")]
    Leave {
        /// Room to leave.
        room_id: String,
        /// Participant identity leaving.
        participant_id: String,
    },
    /// Broadcast a practice action to the room.
    #[serde(rename_all = "camelCase")]
    SyncAction {
        /// Room the action targets.
        room_id: String,
        /// Free-form action name (e.g. a move cue).
        action: String,
    },
}

/// Outbound event pushed to clients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Sent once when the socket is established.
    #[serde(rename_all = "camelCase")]
    Connected {
        /// Server-assigned connection identifier.
        connection_id: String,
    },
    /// A participant joined the room (sent to everyone but the joiner).
    #[serde(rename_all = "camelCase")]
    UserJoined {
        /// Room that gained a member.
        room_id: String,
        /// The joining participant.
        participant: Participant,
    },
    /// A participant left the room (sent to everyone but the leaver; also
    /// emitted on involuntary disconnect).
    #[serde(rename_all = "camelCase")]
    UserLeft {
        /// Room that lost a member.
        room_id: String,
        /// The departed participant.
        participant_id: String,
    },
    /// A practice action, stamped by the server and echoed to the whole
    /// room including the originator so everyone applies it at the same
    /// server-assigned time.
    #[serde(rename_all = "camelCase")]
    SyncAction {
        /// Room the action targets.
        room_id: String,
        /// Free-form action name.
        action: String,
        /// Server-assigned wall-clock milliseconds (UTC).
        timestamp: i64,
        /// Per-room monotonic sequence number; breaks ties when clock
        /// coarseness yields identical timestamps.
        seq: u64,
    },
    /// Error acknowledgment sent only to the offending sender.
    #[serde(rename_all = "camelCase")]
    ProtocolError {
        /// Machine-readable code (e.g. `NOT_IN_ROOM`).
        code: String,
        /// Human-readable message.
        message: String,
    },
}

impl ServerEvent {
    /// Build a `protocolError` acknowledgment.
    pub fn protocol_error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProtocolError {
            code: code.into(),
            message: message.into(),
        }
    }

    /// The wire tag of this event, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connected { .. } => "connected",
            Self::UserJoined { .. } => "userJoined",
            Self::UserLeft { .. } => "userLeft",
            Self::SyncAction { .. } => "syncAction",
            Self::ProtocolError { .. } => "protocolError",
        }
    }
}

/// Current UTC time in milliseconds, the timestamp source for sync actions.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
