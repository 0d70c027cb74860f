//! The real-time room sync layer.
//!
//! - [`connection`]: per-socket send handle and liveness bookkeeping
//! - [`registry`]: room membership state (the single source of truth)
//! - [`broadcast`]: event fan-out over registry snapshots
//! - [`coordinator`]: join/leave/syncAction/disconnect semantics
//! - [`handler`]: inbound frame parsing and dispatch
//! - [`heartbeat`]: pong-deadline liveness watchdog
//! - [`session`]: the per-socket task from upgrade to disconnect

pub mod broadcast;
pub mod connection;
pub mod coordinator;
pub mod handler;
pub mod heartbeat;
pub mod registry;
pub mod session;
