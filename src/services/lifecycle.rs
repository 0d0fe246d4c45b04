// src/services/lifecycle.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    error::AppError,
    models::{
        account::{Account, AccountStatus},
        attempt::{AttemptReport, Submission},
        question::QuizPaper,
    },
    services::assessment::AssessmentEngine,
    store::UserRecordStore,
    utils::session::Session,
};

/// Result of `start`.
#[derive(Debug)]
pub enum StartOutcome {
    Issued(QuizPaper),
    /// Account already passed; nothing issued.
    RedirectHome,
}

/// Result of `submit`.
#[derive(Debug)]
pub enum SubmitOutcome {
    Graded(Box<AttemptReport>),
    /// Account already passed; nothing scored.
    RedirectHome,
}

/// Result of `restart`.
#[derive(Debug, PartialEq, Eq)]
pub enum RestartOutcome {
    /// Status is `new`; the caller should re-enter `start`.
    ReadyToStart,
    /// Account already passed; nothing changed.
    RedirectHome,
}

/// State machine deciding when an account may start, submit and retry.
///
/// ```text
/// new    --submit--> failed | passed
/// failed --submit--> failed | passed
/// failed --restart-> new (score kept)
/// new    --restart-> new
/// passed --any-----> passed
/// ```
#[derive(Clone)]
pub struct AttemptLifecycle {
    store: Arc<dyn UserRecordStore>,
    engine: Arc<AssessmentEngine>,
}

impl AttemptLifecycle {
    pub fn new(store: Arc<dyn UserRecordStore>, engine: Arc<AssessmentEngine>) -> Self {
        Self { store, engine }
    }

    pub fn engine(&self) -> &AssessmentEngine {
        &self.engine
    }

    async fn resolve(&self, session: &Session) -> Result<Account, AppError> {
        self.store
            .find(&session.username)
            .await?
            .ok_or_else(|| AppError::AccountNotFound("Please register first.".to_string()))
    }

    /// Issues the question set and stamps the attempt start into the session.
    pub async fn start(
        &self,
        session: Option<&mut Session>,
        now: DateTime<Utc>,
    ) -> Result<StartOutcome, AppError> {
        let session = session.ok_or_else(unauthenticated)?;
        let account = self.resolve(session).await?;

        if account.status.is_terminal() {
            tracing::debug!("'{}' already passed, not issuing a quiz", account.username);
            return Ok(StartOutcome::RedirectHome);
        }

        session.started_at = Some(now);
        tracing::info!("Attempt started for '{}'", account.username);

        Ok(StartOutcome::Issued(QuizPaper {
            questions: self.engine.public_questions(),
            duration_seconds: self.engine.duration_secs(),
            started_at: now,
            deadline: self.engine.attempt_deadline(now),
        }))
    }

    /// Grades a submission and persists the outcome.
    ///
    /// The deadline is reported but not enforced.
    pub async fn submit(
        &self,
        session: Option<&Session>,
        submission: &Submission,
        now: DateTime<Utc>,
    ) -> Result<SubmitOutcome, AppError> {
        let session = session.ok_or_else(unauthenticated)?;
        let account = self.resolve(session).await?;

        if account.status.is_terminal() {
            tracing::debug!("'{}' already passed, ignoring submission", account.username);
            return Ok(SubmitOutcome::RedirectHome);
        }

        let score = self.engine.score(submission);
        let status = self.engine.evaluate(score);

        match self
            .store
            .set_outcome_unless_passed(&account.username, status, Some(score))
            .await
        {
            Ok(()) => {}
            Err(AppError::StateViolation(_)) => {
                tracing::warn!(
                    "'{}' passed concurrently, discarding score {}",
                    account.username,
                    score
                );
                return Ok(SubmitOutcome::RedirectHome);
            }
            Err(e) => return Err(e),
        }

        tracing::info!(
            "'{}' scored {}/{} -> {}",
            account.username,
            score,
            self.engine.question_count(),
            status
        );

        let deadline = session
            .started_at
            .map(|started| self.engine.attempt_deadline(started));

        Ok(SubmitOutcome::Graded(Box::new(AttemptReport {
            username: account.username,
            score,
            total: self.engine.question_count(),
            pass_mark: self.engine.pass_mark(),
            passed: status == AccountStatus::Passed,
            status,
            questions: self.engine.feedback(submission),
            started_at: session.started_at,
            deadline,
            submitted_late: deadline.is_some_and(|d| now > d),
        })))
    }

    /// Resets a failed account to `new`, keeping its last score.
    pub async fn restart(&self, session: Option<&Session>) -> Result<RestartOutcome, AppError> {
        let session = session.ok_or_else(unauthenticated)?;
        let account = self.resolve(session).await?;

        match account.status {
            AccountStatus::Passed => {
                tracing::debug!("'{}' already passed, restart ignored", account.username);
                Ok(RestartOutcome::RedirectHome)
            }
            AccountStatus::New => Ok(RestartOutcome::ReadyToStart),
            AccountStatus::Failed => {
                match self
                    .store
                    .set_outcome_unless_passed(
                        &account.username,
                        AccountStatus::New,
                        account.last_score,
                    )
                    .await
                {
                    Ok(()) => {
                        tracing::info!("'{}' restarted the assessment", account.username);
                        Ok(RestartOutcome::ReadyToStart)
                    }
                    Err(AppError::StateViolation(_)) => Ok(RestartOutcome::RedirectHome),
                    Err(e) => Err(e),
                }
            }
        }
    }
}

fn unauthenticated() -> AppError {
    AppError::AuthError("Please login to take the quiz.".to_string())
}
