//! Storefront service routes

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::{config::ServerConfig, middleware::auth_middleware, state::AppState};

pub mod admin;
pub mod auth;
pub mod branches;
pub mod catalog;
pub mod health;
pub mod offers;
pub mod slideshow;

/// Form overhead allowed on top of the largest accepted file
const FORM_OVERHEAD: usize = 1024 * 1024;

/// Create the router for the storefront service
pub fn create_router(state: AppState) -> Router {
    let config = state.config.clone();

    let authenticated_routes = Router::new()
        .route("/auth/verify", get(auth::verify))
        .route("/offers/:id/redeem", post(offers::redeem_offer))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api = Router::new()
        .route("/health", get(health::health_check))
        .route("/auth/login", post(auth::login))
        .merge(catalog::router())
        .merge(branches::router())
        .merge(offers::router())
        .merge(slideshow::router())
        .merge(authenticated_routes)
        .nest("/admin", admin::router(state.clone()));

    let mut app = Router::new().nest("/api", api);

    let prefix = config.uploads.public_prefix.trim_end_matches('/');
    if prefix.starts_with('/') && prefix.len() > 1 {
        app = app.nest_service(prefix, ServeDir::new(&config.uploads.upload_dir));
    } else {
        warn!("Upload prefix {:?} cannot be served, uploads are not exposed", prefix);
    }

    app.layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(
            config.uploads.max_file_size + FORM_OVERHEAD,
        ))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    match server.allowed_origins() {
        None => layer.allow_origin(Any),
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!("Ignoring invalid CORS origin {:?}", origin);
                        None
                    }
                })
                .collect();
            layer.allow_origin(AllowOrigin::list(origins))
        }
    }
}
