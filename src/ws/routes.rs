use axum::{Router, routing::get};

use crate::{state::AppState, ws::chat::chat_feed_handler};

pub fn create_ws_routes(state: AppState) -> Router {
    Router::new()
        .route("/ws/chat/{campus_id}", get(chat_feed_handler))
        .with_state(state)
}
