//! # stepsync-server
//!
//! The axum HTTP + WebSocket server for the Stepsync backend.
//!
//! - [`sync`]: the real-time room layer — connection registry, broadcaster,
//!   session coordinator, heartbeat, and the per-socket session loop
//! - [`routes`]: REST handlers over the store
//! - [`feedback`]: the AI dance-feedback boundary (analyzer trait, remote
//!   client, deterministic fallback)
//! - [`server`]: router assembly and the listen loop

#![deny(unsafe_code)]

pub mod config;
pub mod feedback;
pub mod health;
pub mod routes;
pub mod server;
pub mod shutdown;
pub mod sync;

pub use config::ServerConfig;
pub use server::{AppState, StepsyncServer};
