use bb8::Pool;
use bb8_redis::RedisConnectionManager;
use sqlx::PgPool;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, broadcast};
use uuid::Uuid;

use crate::{config::Config, models::chat::ChatServerMessage, store::StoreBackend};

/// Buffered events per campus feed before slow subscribers start lagging.
const CHAT_FEED_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct AppState {
    pub postgres: PgPool,
    pub redis: RedisClient,
    pub config: Arc<Config>,
    pub store: Arc<dyn StoreBackend>,
    pub chat_feeds: ChatFeeds,
}

#[derive(Clone, Default)]
pub struct ChatFeeds {
    feeds: Arc<Mutex<HashMap<Uuid, broadcast::Sender<ChatServerMessage>>>>,
}

impl ChatFeeds {
    pub async fn subscribe(&self, campus_id: Uuid) -> broadcast::Receiver<ChatServerMessage> {
        let mut feeds = self.feeds.lock().await;
        feeds
            .entry(campus_id)
            .or_insert_with(|| broadcast::channel(CHAT_FEED_CAPACITY).0)
            .subscribe()
    }

    /// Returns how many live subscribers received the event.
    pub async fn publish(&self, campus_id: Uuid, msg: ChatServerMessage) -> usize {
        let mut feeds = self.feeds.lock().await;
        let Some(sender) = feeds.get(&campus_id) else {
            return 0;
        };

        match sender.send(msg) {
            Ok(receivers) => receivers,
            Err(_) => {
                // Nobody listening any more
                feeds.remove(&campus_id);
                0
            }
        }
    }
}

pub type RedisClient = Pool<RedisConnectionManager>;
