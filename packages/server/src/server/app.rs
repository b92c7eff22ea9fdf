//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware, Router,
};
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::domains::auth::JwtService;
use crate::domains::{auth, capacity, intake, shelters};
use crate::kernel::Notifier;
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_service: Arc<JwtService>,
    pub notifier: Arc<Notifier>,
}

/// Build the Axum application router
///
/// Layer order matters: layers run top-down for a request, so the trace
/// and CORS layers wrap everything, the state extension is in place before
/// the auth middleware runs, and handlers see both.
pub fn build_app(
    pool: PgPool,
    jwt_secret: &str,
    jwt_issuer: String,
    allowed_origins: Vec<String>,
    notifier: Arc<Notifier>,
) -> Router {
    let jwt_service = Arc::new(JwtService::new(jwt_secret, jwt_issuer));

    let app_state = AppState {
        db_pool: pool.clone(),
        jwt_service: jwt_service.clone(),
        notifier,
    };

    // CORS restricted to the configured origin list
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    // Clones for the middleware closure
    let jwt_service_for_middleware = jwt_service.clone();
    let pool_for_middleware = pool.clone();

    Router::new()
        .merge(routes::root::router())
        .nest("/auth", auth::routes::router())
        .nest("/shelters", shelters::routes::router())
        .nest("/capacity", capacity::routes::router())
        .nest("/intake", intake::routes::router())
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(
                jwt_service_for_middleware.clone(),
                pool_for_middleware.clone(),
                req,
                next,
            )
        }))
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
