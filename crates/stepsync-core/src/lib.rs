//! # stepsync-core
//!
//! Foundation types for the Stepsync dance-practice backend.
//!
//! This crate provides the shared vocabulary the server and store crates
//! depend on:
//!
//! - **Protocol**: the closed set of sync messages exchanged over the
//!   WebSocket channel (`ClientMessage`, `ServerEvent`, `Participant`)
//! - **Models**: stored records (`User`, `DanceTutorial`, `Challenge`,
//!   `Submission`, `PracticeSession`, `AiFeedback`)
//! - **IDs**: prefixed UUID v7 generators (`conn_`, `sess_`, `fbk_`, ...)

#![deny(unsafe_code)]

pub mod ids;
pub mod models;
pub mod protocol;
