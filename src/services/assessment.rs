// src/services/assessment.rs

use chrono::{DateTime, Duration, Utc};

use crate::{
    bank::PYTHON_BASICS,
    config::{Config, DEFAULT_QUIZ_DURATION_SECS, MAX_QUIZ_DURATION_SECS},
    models::{
        account::AccountStatus,
        attempt::{QuestionFeedback, Submission},
        question::{PublicQuestion, Question},
    },
};

/// Holds the question bank and grades submissions against it.
#[derive(Debug, Clone)]
pub struct AssessmentEngine {
    bank: &'static [Question],
    pass_mark: i64,
    duration: Duration,
}

impl AssessmentEngine {
    pub fn new(bank: &'static [Question], pass_mark: i64, duration_secs: i64) -> Self {
        let duration = Duration::try_seconds(duration_secs)
            .filter(|d| *d > Duration::zero() && *d <= Duration::seconds(MAX_QUIZ_DURATION_SECS))
            .unwrap_or_else(|| {
                tracing::warn!(
                    "Unusable attempt duration {}s, using {}s",
                    duration_secs,
                    DEFAULT_QUIZ_DURATION_SECS
                );
                Duration::seconds(DEFAULT_QUIZ_DURATION_SECS)
            });

        Self {
            bank,
            pass_mark,
            duration,
        }
    }

    /// Engine over the built-in bank with thresholds taken from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&PYTHON_BASICS, config.pass_mark, config.quiz_duration_secs)
    }

    pub fn question_set(&self) -> &'static [Question] {
        self.bank
    }

    /// Questions as shown to the user, without the answer key.
    pub fn public_questions(&self) -> Vec<PublicQuestion> {
        self.question_set().iter().map(PublicQuestion::from).collect()
    }

    pub fn question_count(&self) -> usize {
        self.bank.len()
    }

    pub fn pass_mark(&self) -> i64 {
        self.pass_mark
    }

    pub fn duration_secs(&self) -> i64 {
        self.duration.num_seconds()
    }

    /// Advisory deadline for an attempt started at `now`. Not enforced.
    /// Saturates at the latest representable instant.
    pub fn attempt_deadline(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_add_signed(self.duration)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// One point per bank question whose submitted option equals the correct one.
    /// Always within `0..=question_count()`.
    pub fn score(&self, submission: &Submission) -> i64 {
        self.bank
            .iter()
            .filter(|q| submission.selected(q.id) == Some(q.correct_index))
            .count() as i64
    }

    pub fn evaluate(&self, score: i64) -> AccountStatus {
        if score >= self.pass_mark {
            AccountStatus::Passed
        } else {
            AccountStatus::Failed
        }
    }

    /// Per-question comparison of what was submitted against the answer key.
    pub fn feedback(&self, submission: &Submission) -> Vec<QuestionFeedback> {
        self.bank
            .iter()
            .map(|q| {
                let submitted = submission.selected(q.id);
                QuestionFeedback {
                    id: q.id,
                    text: q.text,
                    options: q.options,
                    submitted,
                    correct_index: q.correct_index,
                    is_correct: submitted == Some(q.correct_index),
                }
            })
            .collect()
    }
}
