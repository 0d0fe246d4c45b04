// src/utils/session.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::Config, error::AppError};

pub const SESSION_COOKIE: &str = "session";

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - the normalized username.
    pub sub: String,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
    /// When the current attempt was issued, as Unix timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
}

/// Identity and attempt timing of one login session.
///
/// Lives only in the signed token; nothing here reaches the account store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub started_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            started_at: None,
        }
    }
}

/// Session resolved for the current request, if any.
#[derive(Debug, Clone, Default)]
pub struct CurrentSession(pub Option<Session>);

/// Signs a session token valid for `expiration_seconds`.
pub fn sign_session(
    session: &Session,
    secret: &str,
    expiration_seconds: u64,
) -> Result<String, AppError> {
    // Calculate expiration: current time + expiration_seconds
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs() as usize
        + expiration_seconds as usize;

    let claims = Claims {
        sub: session.username.clone(),
        exp: expiration,
        started_at: session.started_at.map(|t| t.timestamp()),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a session token.
pub fn verify_session(token: &str, secret: &str) -> Result<Session, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthError("Invalid session".to_string()))?;

    let claims = token_data.claims;
    Ok(Session {
        username: claims.sub,
        started_at: claims
            .started_at
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
    })
}

/// `Set-Cookie` value carrying a session token.
pub fn session_cookie(token: &str, max_age_seconds: u64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, max_age_seconds
    )
}

/// `Set-Cookie` value that expires the session cookie.
pub fn cleared_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

fn bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

fn cookie_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token)
        .filter(|token| !token.is_empty())
}

/// Axum Middleware: Session resolution.
///
/// Reads the token from 'Authorization: Bearer <token>' or the session cookie,
/// using the first one that verifies, and injects `CurrentSession` into the request extensions. Missing, invalid
/// or expired tokens resolve to an anonymous session; gating is left to the
/// operations themselves.
pub async fn session_middleware(
    State(config): State<Config>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // A stale header must not shadow a valid cookie.
    let session = [bearer_token(&req), cookie_token(&req)]
        .into_iter()
        .flatten()
        .find_map(|token| match verify_session(token, &config.secret_key) {
            Ok(session) => Some(session),
            Err(_) => {
                tracing::debug!("Ignoring invalid session token");
                None
            }
        });

    req.extensions_mut().insert(CurrentSession(session));
    next.run(req).await
}
