use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const MAX_CHAT_CHARS: usize = 500;
pub const CHAT_HISTORY_LEN: i64 = 50;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub campus_id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub body: String,
    pub party_id: Option<Uuid>,
    pub fraternity_id: Option<Uuid>,
    pub upvotes: i64,
    pub downvotes: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatSort {
    #[default]
    New,
    Hot,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ChatClientMessage {
    Ping { ts: u64 },
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ChatServerMessage {
    Chat {
        message: ChatMessage,
    },
    ChatHistory {
        messages: Vec<ChatMessage>,
    },
    #[serde(rename_all = "camelCase")]
    VoteUpdate {
        message_id: Uuid,
        upvotes: i64,
        downvotes: i64,
    },
    Pong {
        ts: u64,
        pong: u64,
    },
    Error {
        message: String,
    },
}
