// src/handlers/auth.rs

use axum::{
    Form, Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    config::Config,
    error::AppError,
    models::account::CredentialsForm,
    services::AccountService,
    utils::session::{Session, cleared_session_cookie, session_cookie, sign_session},
};

/// Describes the registration form.
pub async fn register_form() -> impl IntoResponse {
    Json(json!({
        "action": "/register",
        "method": "POST",
        "fields": ["username", "password"],
    }))
}

/// Describes the login form.
pub async fn login_form() -> impl IntoResponse {
    Json(json!({
        "action": "/login",
        "method": "POST",
        "fields": ["username", "password"],
    }))
}

/// Registers a new account.
///
/// Hashes the credential using Argon2 before storing it.
/// Returns 201 Created and the account (excluding the credential).
pub async fn register(
    State(accounts): State<AccountService>,
    Form(form): Form<CredentialsForm>,
) -> Result<impl IntoResponse, AppError> {
    let account = accounts.register(&form.username, &form.credential).await?;

    Ok((StatusCode::CREATED, Json(account)))
}

/// Authenticates a user and starts a session.
///
/// The signed session token is returned in the body and set as a cookie.
pub async fn login(
    State(accounts): State<AccountService>,
    State(config): State<Config>,
    Form(form): Form<CredentialsForm>,
) -> Result<impl IntoResponse, AppError> {
    let account = accounts.authenticate(&form.username, &form.credential).await?;

    let session = Session::new(account.username.clone());
    let token = sign_session(&session, &config.secret_key, config.session_ttl_secs)?;

    Ok((
        [(
            header::SET_COOKIE,
            session_cookie(&token, config.session_ttl_secs),
        )],
        Json(json!({
            "token": token,
            "type": "Bearer",
            "username": account.username,
            "status": account.status,
        })),
    ))
}

/// Clears the session identity held in the cookie.
///
/// Tokens are stateless: a Bearer token handed out by `login` or `/quiz`
/// stays valid until its `exp` (`SESSION_TTL`). Header clients log out by
/// discarding the token.
pub async fn logout() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, cleared_session_cookie())],
        Json(json!({
            "message": "You have been logged out.",
            "bearer_tokens": "valid until expiry; discard on the client",
        })),
    )
}
