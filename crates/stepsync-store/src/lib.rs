//! # stepsync-store
//!
//! SQLite persistence for the Stepsync backend.
//!
//! - [`connection`]: r2d2 pool, WAL mode and pragmas applied on open
//! - [`migrations`]: embedded, versioned schema migrations
//! - [`repositories`]: stateless per-record repositories (every method
//!   takes `&Connection`)
//! - [`Store`]: pool-owning facade consumed by the HTTP handlers
//!
//! The sync layer never touches this crate; it only consumes practice
//! session IDs as opaque room identifiers.

#![deny(unsafe_code)]

pub mod connection;
pub mod errors;
pub mod migrations;
pub mod repositories;
pub mod store;

pub use connection::{ConnectionConfig, ConnectionPool, new_file, new_in_memory};
pub use errors::{Result, StoreError};
pub use store::Store;
