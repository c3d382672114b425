//! Single sign-on service built with Rust.
//!
//! Registers users, checks their credentials and issues JWTs signed with the
//! secret of the application the user is logging into.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;

pub use config::Config;
pub use error::AppError;
pub use handlers::http::AppState;
pub use services::AuthService;

use axum::routing::{get, post};
use handlers::http;
use std::time::Duration;
use tower_http::{catch_panic::CatchPanicLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Build the API router (auth, health). Used by main and by integration tests.
pub fn create_app(state: AppState, request_timeout: Duration) -> axum::Router {
    let auth_routes = axum::Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/is_admin", post(auth::is_admin));

    axum::Router::new()
        .route("/health", get(http::health))
        .nest("/auth", auth_routes)
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::log_payloads))
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}
