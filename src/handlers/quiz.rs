// src/handlers/quiz.rs

use std::collections::HashMap;

use axum::{
    Extension, Form, Json,
    extract::State,
    http::{HeaderValue, header},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::Serialize;

use crate::{
    config::Config,
    error::AppError,
    models::{attempt::Submission, question::QuizPaper},
    services::{
        AttemptLifecycle,
        lifecycle::{RestartOutcome, StartOutcome, SubmitOutcome},
    },
    utils::session::{CurrentSession, session_cookie, sign_session},
};

/// Issued paper plus the re-signed session carrying the attempt start.
#[derive(Debug, Serialize)]
struct IssuedQuiz {
    #[serde(flatten)]
    paper: QuizPaper,
    token: Option<String>,
}

/// Starts an attempt.
///
/// Returns the question set (answer key hidden) and the advisory deadline.
/// Passed accounts are redirected home.
pub async fn start_quiz(
    State(lifecycle): State<AttemptLifecycle>,
    State(config): State<Config>,
    Extension(CurrentSession(mut session)): Extension<CurrentSession>,
) -> Result<Response, AppError> {
    let paper = match lifecycle.start(session.as_mut(), Utc::now()).await? {
        StartOutcome::Issued(paper) => paper,
        StartOutcome::RedirectHome => return Ok(Redirect::to("/").into_response()),
    };

    let token = session
        .as_ref()
        .map(|s| sign_session(s, &config.secret_key, config.session_ttl_secs))
        .transpose()?;

    let cookie = token
        .as_deref()
        .map(|t| session_cookie(t, config.session_ttl_secs));

    let mut response = Json(IssuedQuiz { paper, token }).into_response();
    if let Some(cookie) = cookie {
        let value = cookie
            .parse::<HeaderValue>()
            .map_err(|_| AppError::InternalServerError("invalid cookie value".to_string()))?;
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    Ok(response)
}

/// Grades a submission.
///
/// Expects one form field per question keyed by its id; absent fields are unanswered.
pub async fn submit_quiz(
    State(lifecycle): State<AttemptLifecycle>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let submission = Submission::from_form(&fields)?;

    match lifecycle
        .submit(session.as_ref(), &submission, Utc::now())
        .await?
    {
        SubmitOutcome::Graded(report) => Ok(Json(report).into_response()),
        SubmitOutcome::RedirectHome => Ok(Redirect::to("/").into_response()),
    }
}

/// Resets a failed attempt and sends the user back to the quiz.
pub async fn restart_quiz(
    State(lifecycle): State<AttemptLifecycle>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Result<Redirect, AppError> {
    match lifecycle.restart(session.as_ref()).await? {
        RestartOutcome::ReadyToStart => Ok(Redirect::to("/quiz")),
        RestartOutcome::RedirectHome => Ok(Redirect::to("/")),
    }
}
