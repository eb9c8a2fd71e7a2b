//! WebSocket handler for worker and dashboard pages.
//!
//! Pages connect to `/ws?page=worker` or `/ws?page=dashboard`. Each socket
//! gets its own outbox; inbound text frames are decoded as client events.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{debug, warn};

use super::events::PageKind;
use super::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct WsParams {
    #[serde(default)]
    pub page: PageKind,
}

/// WebSocket upgrade handler, GET /ws
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, params.page))
}

async fn handle_socket(socket: WebSocket, state: AppState, page: PageKind) {
    let (mut sender, mut receiver) = socket.split();
    let (connection, mut outbox) = state.connect(page).await;

    debug!(connection = %connection, ?page, "WebSocket client connected");

    loop {
        tokio::select! {
            // Frames addressed to this socket
            Some(json) = outbox.recv() => {
                if sender.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Text(text))) => {
                        state.dispatch_text(connection, text.as_str()).await;
                    }
                    Some(Err(e)) => {
                        warn!(connection = %connection, "WebSocket error: {}", e);
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    state.disconnect(connection).await;
    debug!(connection = %connection, "WebSocket client disconnected");
}
