use axum::{
    extract::{ConnectInfo, Request},
    http::{HeaderValue, Method, StatusCode},
    middleware::Next,
    response::Response,
};
use governor::{Quota, RateLimiter, clock::DefaultClock, state::keyed::DefaultKeyedStateStore};
use std::{net::SocketAddr, num::NonZeroU32, sync::Arc, time::Duration};
use tower_http::cors::CorsLayer;

pub type IpRateLimiter = Arc<RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>>;

const GLOBAL_REQUESTS_PER_MINUTE: NonZeroU32 = NonZeroU32::new(1000).unwrap();
const WRITE_REQUESTS_PER_MINUTE: NonZeroU32 = NonZeroU32::new(120).unwrap();

#[derive(Clone)]
pub struct RateLimiters {
    pub global: IpRateLimiter,
    pub writes: IpRateLimiter,
}

impl RateLimiters {
    pub fn new() -> Self {
        Self {
            global: Arc::new(RateLimiter::keyed(Quota::per_minute(
                GLOBAL_REQUESTS_PER_MINUTE,
            ))),
            // Ratings, votes and posts share a stricter budget
            writes: Arc::new(RateLimiter::keyed(Quota::per_minute(
                WRITE_REQUESTS_PER_MINUTE,
            ))),
        }
    }
}

impl Default for RateLimiters {
    fn default() -> Self {
        Self::new()
    }
}

fn is_write(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

// IP-based rate limiting middleware function
pub async fn rate_limit_middleware(
    limiters: RateLimiters,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let client_ip =
        if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
            addr.ip().to_string()
        } else {
            "unknown".to_string()
        };

    if limiters.global.check_key(&client_ip).is_err() {
        tracing::warn!("Rate limit exceeded for IP: {}", client_ip);
        return Err(StatusCode::TOO_MANY_REQUESTS);
    }

    if is_write(request.method()) && limiters.writes.check_key(&client_ip).is_err() {
        tracing::warn!("Write rate limit exceeded for IP: {}", client_ip);
        return Err(StatusCode::TOO_MANY_REQUESTS);
    }

    Ok(next.run(request).await)
}

pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin {}: {}", origin, e);
                None
            }
        })
        .collect::<Vec<_>>();

    tracing::info!("CORS allowed origins: {:?}", origins);

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
