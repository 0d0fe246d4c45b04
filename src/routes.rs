// src/routes.rs

use axum::{
    Router,
    http::{Method, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, home, quiz},
    state::AppState,
    utils::session::session_middleware,
};

/// Assembles the main application router.
///
/// * Account routes (register, login, logout) and the attempt routes (quiz, submit, restart).
/// * Global middleware: Trace, CORS, then session resolution.
/// * Injects global state (services + config).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let account_routes = Router::new()
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout));

    let attempt_routes = Router::new()
        .route("/quiz", get(quiz::start_quiz))
        .route("/submit", post(quiz::submit_quiz))
        .route("/restart", get(quiz::restart_quiz));

    Router::new()
        .route("/", get(home::home))
        .merge(account_routes)
        .merge(attempt_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    session_middleware,
                )),
        )
        .with_state(state)
}
