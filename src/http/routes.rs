use axum::{
    Router,
    routing::{get, post, put},
};

use crate::{
    http::handlers::{
        campus::{create_campus_handler, get_campus_handler, get_campuses_handler},
        chat::{get_chat_handler, post_chat_handler, vote_chat_handler},
        comment::{create_comment_handler, get_comments_handler, vote_comment_handler},
        demo::{
            create_entity_handler, delete_entity_handler, get_entity_handler,
            list_entities_handler, update_entity_handler,
        },
        fraternity::{
            create_fraternity_handler, get_campus_fraternities_handler,
            get_fraternity_handler, get_fraternity_parties_handler,
        },
        health_handler,
        leaderboard::{get_leaderboard_handler, get_party_leaderboard_handler},
        party::{create_party_handler, get_campus_parties_handler, get_party_handler},
        photo::{create_photo_handler, get_photos_handler, vote_photo_handler},
        plan::{get_my_plan_vote_handler, get_plan_handler, vote_plan_handler},
        rating::{
            get_my_party_rating_handler, get_my_reputation_rating_handler, rate_fraternity_handler,
            rate_party_handler,
        },
    },
    state::AppState,
};

pub fn create_http_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        // Campuses
        .route(
            "/campuses",
            get(get_campuses_handler).post(create_campus_handler),
        )
        .route("/campuses/{campus_id}", get(get_campus_handler))
        .route(
            "/campuses/{campus_id}/fraternities",
            get(get_campus_fraternities_handler).post(create_fraternity_handler),
        )
        .route(
            "/campuses/{campus_id}/parties",
            get(get_campus_parties_handler),
        )
        .route(
            "/campuses/{campus_id}/leaderboard",
            get(get_leaderboard_handler),
        )
        .route(
            "/campuses/{campus_id}/leaderboard/parties",
            get(get_party_leaderboard_handler),
        )
        .route(
            "/campuses/{campus_id}/chat",
            get(get_chat_handler).post(post_chat_handler),
        )
        .route(
            "/campuses/{campus_id}/plans/{night}",
            get(get_plan_handler).put(vote_plan_handler),
        )
        .route(
            "/campuses/{campus_id}/plans/{night}/me",
            get(get_my_plan_vote_handler),
        )
        // Fraternities
        .route("/fraternities/{fraternity_id}", get(get_fraternity_handler))
        .route(
            "/fraternities/{fraternity_id}/parties",
            get(get_fraternity_parties_handler).post(create_party_handler),
        )
        .route(
            "/fraternities/{fraternity_id}/reputation",
            put(rate_fraternity_handler),
        )
        .route(
            "/fraternities/{fraternity_id}/reputation/me",
            get(get_my_reputation_rating_handler),
        )
        // Parties
        .route("/parties/{party_id}", get(get_party_handler))
        .route(
            "/parties/{party_id}/rating",
            put(rate_party_handler),
        )
        .route(
            "/parties/{party_id}/rating/me",
            get(get_my_party_rating_handler),
        )
        .route(
            "/parties/{party_id}/comments",
            get(get_comments_handler).post(create_comment_handler),
        )
        .route(
            "/parties/{party_id}/photos",
            get(get_photos_handler).post(create_photo_handler),
        )
        // Votes
        .route("/comments/{comment_id}/vote", post(vote_comment_handler))
        .route("/photos/{photo_id}/vote", post(vote_photo_handler))
        .route("/chat/{message_id}/vote", post(vote_chat_handler))
        // Offline/demo entity store
        .route(
            "/demo/{entity}",
            get(list_entities_handler).post(create_entity_handler),
        )
        .route(
            "/demo/{entity}/{id}",
            get(get_entity_handler)
                .patch(update_entity_handler)
                .delete(delete_entity_handler),
        )
        .with_state(state)
}
