//! Server configuration.
//!
//! Defaults live here; the binary layers a JSON file and `STEPSYNC_*`
//! environment variables over them with figment.

use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized};
use serde::{Deserialize, Serialize};

/// Configuration for the Stepsync server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind (default `"127.0.0.1"`).
    pub host: String,
    /// Port to bind (default `0` for auto-assign).
    pub port: u16,
    /// Per-connection outbound channel capacity.
    pub send_buffer: usize,
    /// Heartbeat ping interval in seconds.
    pub heartbeat_interval_secs: u64,
    /// Disconnect after this long without a pong.
    pub heartbeat_timeout_secs: u64,
    /// SQLite database path (`:memory:` for an ephemeral store).
    pub db_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            send_buffer: 256,
            heartbeat_interval_secs: 30,
            heartbeat_timeout_secs: 90,
            db_path: "stepsync.db".into(),
        }
    }
}

impl ServerConfig {
    /// Load configuration: defaults, then an optional JSON file, then
    /// `STEPSYNC_*` environment variables.
    pub fn load(config_path: Option<&str>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = config_path {
            figment = figment.merge(Json::file(path));
        }
        figment.merge(Env::prefixed("STEPSYNC_")).extract()
    }
}
