//! Voice session socket: the client forwards assistant events, the server
//! answers with transcript snapshots whenever the transcript changes.

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    response::IntoResponse,
    Extension,
};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::voice::{TranscriptView, VoiceEvent, VoiceHub};

/// Server → Client messages
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerMessage {
    /// Credentials the client needs to open the assistant call
    Session {
        public_key: String,
        assistant_id: String,
    },
    Transcript {
        transcript: TranscriptView,
    },
    Error {
        message: String,
    },
}

/// GET /ws/voice
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Extension(config): Extension<Config>,
    Extension(hub): Extension<VoiceHub>,
) -> Result<impl IntoResponse, AppError> {
    let Some(voice) = config.voice else {
        return Err(AppError::Unavailable("Voice assistant is not configured".into()));
    };
    let hello = ServerMessage::Session {
        public_key: voice.api_key,
        assistant_id: voice.assistant_id,
    };
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, hub, hello)))
}

async fn send(
    sender: &mut SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
) -> Result<(), axum::Error> {
    match serde_json::to_string(msg) {
        Ok(text) => sender.send(Message::Text(text.into())).await,
        Err(e) => {
            warn!(error = %e, "Failed to encode voice message");
            Ok(())
        }
    }
}

async fn handle_socket(socket: WebSocket, hub: VoiceHub, hello: ServerMessage) {
    let (mut sender, mut receiver) = socket.split();
    let mut updates = hub.subscribe();

    let transcript = updates.borrow_and_update().clone();
    if send(&mut sender, &hello).await.is_err()
        || send(&mut sender, &ServerMessage::Transcript { transcript })
            .await
            .is_err()
    {
        return;
    }

    // whether this socket opened the active call
    let mut owns_call = false;

    loop {
        tokio::select! {
            msg = receiver.next() => {
                let text = match msg {
                    Some(Ok(Message::Text(t))) => t.to_string(),
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => continue,
                };
                match serde_json::from_str::<VoiceEvent>(&text) {
                    Ok(VoiceEvent::Start) => {
                        if hub.start().await {
                            owns_call = true;
                        } else {
                            debug!("Voice call already active on another socket");
                        }
                    }
                    Ok(event @ (VoiceEvent::End | VoiceEvent::Error { .. })) => {
                        owns_call = false;
                        hub.send(event).await;
                    }
                    Ok(event) => hub.send(event).await,
                    Err(e) => {
                        let error = ServerMessage::Error {
                            message: format!("Invalid message: {e}"),
                        };
                        if send(&mut sender, &error).await.is_err() {
                            break;
                        }
                    }
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let transcript = updates.borrow_and_update().clone();
                if send(&mut sender, &ServerMessage::Transcript { transcript }).await.is_err() {
                    break;
                }
            }
        }
    }

    debug!(owns_call, "Voice socket closed");
    if owns_call {
        hub.send(VoiceEvent::End).await;
    }
}
