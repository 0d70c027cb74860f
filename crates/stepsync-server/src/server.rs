//! `StepsyncServer` — axum HTTP + WebSocket server assembly.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use axum::extract::{State, WebSocketUpgrade};
use axum::response::{Json, Response};
use axum::routing::get;
use stepsync_core::ids;
use stepsync_store::Store;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::feedback::FeedbackService;
use crate::health::{self, HealthResponse};
use crate::routes;
use crate::shutdown::ShutdownCoordinator;
use crate::sync::coordinator::SessionCoordinator;
use crate::sync::session::{SessionTiming, run_ws_session};

/// Shared state accessible from axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Record store.
    pub store: Store,
    /// AI feedback boundary.
    pub feedback: Arc<FeedbackService>,
    /// Room sync coordinator.
    pub coordinator: Arc<SessionCoordinator>,
    /// Shutdown coordinator.
    pub shutdown: Arc<ShutdownCoordinator>,
    /// Per-socket timing knobs.
    pub timing: SessionTiming,
    /// When the server started.
    pub start_time: Instant,
}

/// The assembled Stepsync server.
pub struct StepsyncServer {
    config: ServerConfig,
    state: AppState,
}

impl StepsyncServer {
    /// Assemble the server from explicitly constructed parts.
    pub fn new(
        config: ServerConfig,
        store: Store,
        feedback: Arc<FeedbackService>,
        coordinator: Arc<SessionCoordinator>,
    ) -> Self {
        let timing = SessionTiming {
            ping_interval: Duration::from_secs(config.heartbeat_interval_secs),
            pong_timeout: Duration::from_secs(config.heartbeat_timeout_secs),
            send_buffer: config.send_buffer,
        };
        let state = AppState {
            store,
            feedback,
            coordinator,
            shutdown: Arc::new(ShutdownCoordinator::new()),
            timing,
            start_time: Instant::now(),
        };
        Self { config, state }
    }

    /// Build the axum router with all routes.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/ws", get(ws_handler))
            .nest("/api", routes::api_router())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// The shutdown coordinator.
    pub fn shutdown(&self) -> &Arc<ShutdownCoordinator> {
        &self.state.shutdown
    }

    /// The server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Bind and serve until the shutdown token fires.
    pub async fn listen(&self) -> std::io::Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!(addr = %listener.local_addr()?, "listening");

        let token = self.state.shutdown.token();
        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move { token.cancelled().await })
            .await
    }
}

/// `GET /health`
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let registry = state.coordinator.registry();
    let resp = health::health_check(
        state.start_time,
        registry.connection_count().await,
        registry.active_room_count().await,
    );
    Json(resp)
}

/// `GET /ws` — upgrade into the sync session loop.
async fn ws_handler(State(state): State<AppState>, upgrade: WebSocketUpgrade) -> Response {
    let connection_id = ids::connection_id();
    let coordinator = state.coordinator.clone();
    let timing = state.timing;
    let shutdown = state.shutdown.token();
    upgrade.on_upgrade(move |socket| {
        run_ws_session(socket, connection_id, coordinator, timing, shutdown)
    })
}
