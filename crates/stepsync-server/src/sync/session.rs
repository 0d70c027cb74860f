//! WebSocket session lifecycle — one connected client from upgrade
//! through disconnect.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use stepsync_core::protocol::ServerEvent;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::connection::ClientConnection;
use super::coordinator::SessionCoordinator;
use super::handler::handle_frame;
use super::heartbeat::{HeartbeatResult, run_heartbeat};

/// Timing knobs for one socket session.
#[derive(Clone, Copy, Debug)]
pub struct SessionTiming {
    /// Interval between server-initiated Ping frames.
    pub ping_interval: Duration,
    /// Disconnect after this long without a pong.
    pub pong_timeout: Duration,
    /// Outbound channel capacity.
    pub send_buffer: usize,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            ping_interval: Duration::from_secs(30),
            pong_timeout: Duration::from_secs(90),
            send_buffer: 256,
        }
    }
}

/// Run a WebSocket session for a connected client.
///
/// 1. Registers with the coordinator and sends the `connected` event
/// 2. Dispatches incoming text (or UTF-8 binary) frames through the handler
/// 3. Forwards outbound events via the send channel, with periodic Pings
/// 4. Monitors pong liveness and disconnects unresponsive clients
/// 5. On close, runs the coordinator's disconnect path
#[instrument(skip_all, fields(conn_id = %connection_id))]
pub async fn run_ws_session(
    ws: WebSocket,
    connection_id: String,
    coordinator: Arc<SessionCoordinator>,
    timing: SessionTiming,
    shutdown: CancellationToken,
) {
    let (mut ws_tx, mut ws_rx) = ws.split();

    let (send_tx, mut send_rx) = mpsc::channel::<Arc<String>>(timing.send_buffer);
    let connection = Arc::new(ClientConnection::new(connection_id.clone(), send_tx));

    info!("client connected");
    coordinator.register(connection.clone()).await;

    let connected = ServerEvent::Connected {
        connection_id: connection_id.clone(),
    };
    if let Ok(json) = serde_json::to_string(&connected) {
        let _ = ws_tx.send(Message::Text(json.into())).await;
    }

    // Outbound forwarder with periodic Ping frames
    let outbound = tokio::spawn(async move {
        let mut ping_interval = tokio::time::interval(timing.ping_interval);
        // Skip the immediate first tick
        let _ = ping_interval.tick().await;

        loop {
            tokio::select! {
                msg = send_rx.recv() => {
                    match msg {
                        Some(text) => {
                            if ws_tx.send(Message::Text(text.as_str().into())).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                _ = ping_interval.tick() => {
                    if ws_tx.send(Message::Ping(vec![].into())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // Liveness monitor; trips the session token when the client goes quiet
    let session_cancel = shutdown.child_token();
    let hb_cancel = session_cancel.clone();
    let hb_conn = connection.clone();
    let heartbeat = tokio::spawn(async move {
        if run_heartbeat(
            hb_conn,
            timing.ping_interval,
            timing.pong_timeout,
            hb_cancel.clone(),
        )
        .await
            == HeartbeatResult::TimedOut
        {
            warn!("client unresponsive, closing session");
            hb_cancel.cancel();
        }
    });

    loop {
        tokio::select! {
            () = session_cancel.cancelled() => {
                debug!("session cancelled");
                break;
            }
            msg = ws_rx.next() => {
                let Some(Ok(msg)) = msg else { break };
                let text = match msg {
                    Message::Text(ref t) => {
                        connection.record_pong();
                        Some(t.to_string())
                    }
                    // Some clients send JSON in binary frames
                    Message::Binary(ref data) => {
                        connection.record_pong();
                        match std::str::from_utf8(data) {
                            Ok(s) => Some(s.to_string()),
                            Err(_) => {
                                debug!(len = data.len(), "ignoring non-UTF8 binary frame");
                                None
                            }
                        }
                    }
                    Message::Close(_) => {
                        info!("client sent close frame");
                        break;
                    }
                    Message::Ping(_) | Message::Pong(_) => {
                        connection.record_pong();
                        None
                    }
                };

                if let Some(text) = text {
                    handle_frame(&text, &connection, &coordinator).await;
                }
            }
        }
    }

    info!(dropped = connection.dropped_total(), "client disconnected");
    session_cancel.cancel();
    heartbeat.abort();
    outbound.abort();
    coordinator.handle_disconnect(&connection_id).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Socket-level behavior is exercised end to end in
    // tests/integration.rs; here we pin the session constants and the
    // establishment payload shape.

    #[test]
    fn default_timing() {
        let timing = SessionTiming::default();
        assert_eq!(timing.ping_interval, Duration::from_secs(30));
        assert_eq!(timing.pong_timeout, Duration::from_secs(90));
        assert_eq!(timing.send_buffer, 256);
    }

    #[test]
    fn connected_event_wire_shape() {
        let event = ServerEvent::Connected {
            connection_id: "conn_1".into(),
        };
        let v: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(v["type"], "connected");
        assert_eq!(v["connectionId"], "conn_1");
    }
}
