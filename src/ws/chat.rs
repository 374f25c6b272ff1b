use axum::{
    extract::{
        ConnectInfo, Path, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use futures::{SinkExt, StreamExt, stream::SplitSink};
use std::{collections::HashSet, net::SocketAddr};
use tokio::sync::broadcast::{self, error::RecvError};
use uuid::Uuid;

use crate::{
    db::{campus::get::get_campus, chat::get::get_campus_chat},
    models::chat::{CHAT_HISTORY_LEN, ChatClientMessage, ChatMessage, ChatServerMessage, ChatSort},
    state::AppState,
};

pub async fn chat_feed_handler(
    ws: WebSocketUpgrade,
    Path(campus_id): Path<Uuid>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    tracing::info!("New chat feed connection from {} for campus {}", addr, campus_id);

    get_campus(campus_id, state.postgres.clone())
        .await
        .map_err(|e| e.to_response())?;

    // Subscribe first: anything posted while history loads is either in the
    // history or queued on the feed
    let feed = state.chat_feeds.subscribe(campus_id).await;

    let mut history = get_campus_chat(
        campus_id,
        ChatSort::New,
        CHAT_HISTORY_LEN,
        state.postgres.clone(),
    )
    .await
    .map_err(|e| {
        tracing::error!("Failed to load chat history for {}: {}", campus_id, e);
        e.to_response()
    })?;
    // Oldest first, the way a feed renders
    history.reverse();

    Ok(ws.on_upgrade(move |socket| handle_chat_socket(socket, campus_id, history, feed)))
}

async fn send_server_message(
    sender: &mut SplitSink<WebSocket, Message>,
    msg: &ChatServerMessage,
) -> Result<(), axum::Error> {
    let serialized = match serde_json::to_string(msg) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to serialize chat event: {}", e);
            return Ok(());
        }
    };

    sender.send(Message::Text(serialized.into())).await
}

/// True for a `chat` event whose message already went out with the history.
pub fn is_replay(event: &ChatServerMessage, delivered: &HashSet<Uuid>) -> bool {
    match event {
        ChatServerMessage::Chat { message } => delivered.contains(&message.id),
        _ => false,
    }
}

fn pong_for(ts: u64) -> ChatServerMessage {
    let now = Utc::now().timestamp_millis() as u64;
    ChatServerMessage::Pong {
        ts,
        pong: now.saturating_sub(ts),
    }
}

async fn handle_chat_socket(
    socket: WebSocket,
    campus_id: Uuid,
    history: Vec<ChatMessage>,
    mut feed: broadcast::Receiver<ChatServerMessage>,
) {
    let (mut sender, mut receiver) = socket.split();
    let delivered: HashSet<Uuid> = history.iter().map(|m| m.id).collect();

    let history_msg = ChatServerMessage::ChatHistory { messages: history };
    if let Err(e) = send_server_message(&mut sender, &history_msg).await {
        tracing::warn!("Failed to send chat history for campus {}: {}", campus_id, e);
        return;
    }

    loop {
        tokio::select! {
            incoming = receiver.next() => {
                let reply = match incoming {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ChatClientMessage>(&text) {
                            Ok(ChatClientMessage::Ping { ts }) => pong_for(ts),
                            Err(_) => ChatServerMessage::Error {
                                message: "Unsupported message; post chat over HTTP".to_string(),
                            },
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::debug!("Chat feed for campus {} closed by client", campus_id);
                        break;
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        tracing::warn!("Chat feed socket error for campus {}: {}", campus_id, e);
                        break;
                    }
                };

                if send_server_message(&mut sender, &reply).await.is_err() {
                    break;
                }
            }
            event = feed.recv() => {
                let event = match event {
                    Ok(event) if is_replay(&event, &delivered) => continue,
                    Ok(event) => event,
                    Err(RecvError::Lagged(missed)) => {
                        tracing::warn!("Chat feed subscriber for {} lagged by {}", campus_id, missed);
                        ChatServerMessage::Error {
                            message: format!("Missed {} updates, reload the feed", missed),
                        }
                    }
                    Err(RecvError::Closed) => break,
                };

                if send_server_message(&mut sender, &event).await.is_err() {
                    break;
                }
            }
        }
    }

    let _ = sender.close().await;
}
