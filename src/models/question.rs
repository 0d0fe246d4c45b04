// src/models/question.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One multiple-choice question of the bank.
///
/// Options are selected by position, so their order is part of the question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: i64,

    /// The prompt shown to the user.
    pub text: &'static str,

    pub options: &'static [&'static str],

    /// Index into `options` of the correct answer.
    pub correct_index: usize,
}

/// DTO for sending a question to the client (excludes the answer key).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub text: &'static str,
    pub options: &'static [&'static str],
}

impl From<&Question> for PublicQuestion {
    fn from(q: &Question) -> Self {
        PublicQuestion {
            id: q.id,
            text: q.text,
            options: q.options,
        }
    }
}

/// DTO for returning an issued attempt.
#[derive(Debug, Serialize)]
pub struct QuizPaper {
    pub questions: Vec<PublicQuestion>,
    pub duration_seconds: i64,
    pub started_at: DateTime<Utc>,
    /// Advisory only; submissions after it are scored the same way.
    pub deadline: DateTime<Utc>,
}
