pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod http;
mod middleware;
pub mod models;
pub mod scoring;
pub mod state;
pub mod store;
mod utils;
pub mod ws;

use axum::{Router, middleware as axum_middleware};
use bb8::Pool;
use bb8_redis::RedisConnectionManager;
use middleware::{RateLimiters, cors_layer, rate_limit_middleware};
use sqlx::postgres::PgPoolOptions;
use state::{AppState, ChatFeeds};
use std::{net::SocketAddr, sync::Arc};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::{config::Config, errors::AppError};

pub use utils::sanitize_text;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("fratrank_be=info,tower_http=info"));

    // A test harness may have installed one already
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Routes plus the cross-cutting layers, without binding a socket.
pub fn build_app(state: AppState) -> Router {
    let limiters = RateLimiters::new();
    let cors = cors_layer(&state.config.allowed_origins);

    Router::new()
        .merge(http::create_http_routes(state.clone()))
        .merge(ws::create_ws_routes(state))
        .layer(axum_middleware::from_fn(move |req, next| {
            rate_limit_middleware(limiters.clone(), req, next)
        }))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .fallback(|| async { (axum::http::StatusCode::NOT_FOUND, "404 Not Found") })
}

pub async fn build_state(config: Config) -> Result<AppState, AppError> {
    let postgres = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to connect to Postgres: {}", e)))?;

    sqlx::migrate!("./migrations")
        .run(&postgres)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to run migrations: {}", e)))?;

    let manager = RedisConnectionManager::new(config.redis_url.clone())?;
    let redis = Pool::builder()
        .build(manager)
        .await
        .map_err(AppError::RedisCommandError)?;

    let store = store::build_backend(&config, redis.clone());
    tracing::info!("Demo entity store backend: {:?}", config.store_backend);

    Ok(AppState {
        postgres,
        redis,
        config: Arc::new(config),
        store,
        chat_feeds: ChatFeeds::default(),
    })
}

pub async fn start_server() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env()?;
    let port = config.port;
    let state = build_state(config).await?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .map_err(|e| AppError::EnvError(format!("Failed to bind port {}: {}", port, e)))?;

    tracing::info!("FratRank server running at http://0.0.0.0:{port}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| {
        tracing::error!("Server error: {}", e);
        AppError::InternalError
    })
}
