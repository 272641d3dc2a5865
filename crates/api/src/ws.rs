use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use runtime::{RuntimeEvent, Selection};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
enum SocketMessage<'a> {
    Connected { selection: Selection },
    Refreshed(&'a RuntimeEvent),
}

pub async fn events_socket(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| stream_events(socket, state))
}

async fn stream_events(mut socket: WebSocket, state: AppState) {
    let mut events = state.subscribe_events();
    let selection = state.lock().selection();
    if send_message(&mut socket, &SocketMessage::Connected { selection })
        .await
        .is_err()
    {
        return;
    }

    loop {
        tokio::select! {
            inbound = socket.recv() => {
                match inbound {
                    Some(Ok(Message::Close(_))) | None => return,
                    Some(Ok(_)) => {}
                    Some(Err(_)) => return,
                }
            }
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        // Timers for an abandoned key can still fire once.
                        if !state.is_current(&event) {
                            debug!(key = %event.key, "dropping stale refresh");
                            continue;
                        }
                        if send_message(&mut socket, &SocketMessage::Refreshed(&event)).await.is_err() {
                            return;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "event subscriber lagged");
                        continue;
                    }
                    Err(RecvError::Closed) => return,
                }
            }
        }
    }
}

async fn send_message(socket: &mut WebSocket, message: &SocketMessage<'_>) -> Result<(), ()> {
    let payload = serde_json::to_string(message).map_err(|_| ())?;
    socket.send(Message::Text(payload)).await.map_err(|_| ())
}
