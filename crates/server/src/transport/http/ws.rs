//! WebSocket channel subscriptions.
//!
//! A connection to `/ws/{channel}` receives every message published to the
//! channel as a text frame. The client may send `{"command": "close"}` to
//! end the session; other messages are ignored.

use crate::channels::ChannelHub;
use crate::state::ServerState;
use axum::{
    extract::{
        Path, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct Control {
    #[serde(default)]
    command: Option<String>,
}

pub async fn subscribe(
    ws: WebSocketUpgrade,
    State(state): State<ServerState>,
    Path(channel): Path<String>,
) -> Response {
    let hub = state.hub.clone();
    ws.on_upgrade(move |socket| serve_channel(socket, hub, channel))
}

async fn serve_channel(socket: WebSocket, hub: ChannelHub, channel: String) {
    let (mut sender, mut receiver) = socket.split();
    let mut published = hub.subscribe(&channel);
    debug!("Subscriber joined channel `{}`", channel);

    loop {
        tokio::select! {
            message = published.recv() => match message {
                Ok(text) => {
                    if sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Subscriber of `{}` lagged, {} messages dropped", channel, skipped);
                }
                Err(RecvError::Closed) => break,
            },
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<Control>(&text) {
                        Ok(control) if control.command.as_deref() == Some("close") => {
                            let _ = sender.close().await;
                            break;
                        }
                        Ok(_) => {}
                        Err(e) => debug!("Ignoring malformed message on `{}`: {}", channel, e),
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("WebSocket error on `{}`: {}", channel, e);
                    break;
                }
            },
        }
    }

    drop(published);
    hub.prune(&channel);
    debug!("WebSocket connection closed in channel `{}`", channel);
}
