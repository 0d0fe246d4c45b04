// src/handlers/home.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde::Serialize;

use crate::{
    error::AppError,
    models::account::AccountStatus,
    services::{AccountService, AttemptLifecycle},
    utils::session::CurrentSession,
};

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub username: Option<String>,
    pub status: AccountStatus,
    pub last_score: Option<i64>,
    pub total: usize,
    pub pass_mark: i64,
}

/// Shows the current user's assessment status.
///
/// Anonymous visitors, and sessions whose account has vanished, see `new`.
pub async fn home(
    State(accounts): State<AccountService>,
    State(lifecycle): State<AttemptLifecycle>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Result<impl IntoResponse, AppError> {
    let account = match &session {
        Some(session) => accounts.lookup(&session.username).await?,
        None => None,
    };

    let engine = lifecycle.engine();
    Ok(Json(HomeResponse {
        username: session.map(|s| s.username),
        status: account
            .as_ref()
            .map(|a| a.status)
            .unwrap_or(AccountStatus::New),
        last_score: account.and_then(|a| a.last_score),
        total: engine.question_count(),
        pass_mark: engine.pass_mark(),
    }))
}
