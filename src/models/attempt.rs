// src/models/attempt.rs

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{error::AppError, models::account::AccountStatus};

/// Answers given in one attempt.
/// Key: question id. Value: selected option index. Missing key = unanswered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    answers: HashMap<i64, usize>,
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, question_id: i64, option_index: usize) -> Self {
        self.answers.insert(question_id, option_index);
        self
    }

    pub fn selected(&self, question_id: i64) -> Option<usize> {
        self.answers.get(&question_id).copied()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Builds a submission from posted form fields.
    ///
    /// Fields are keyed by question id, either bare (`3`) or prefixed (`q3`).
    /// Keys that are not question ids are ignored and empty values count as
    /// unanswered. A value that is not an option index is rejected, as is a
    /// question named by more than one field (`q3` and `3`).
    pub fn from_form(fields: &HashMap<String, String>) -> Result<Self, AppError> {
        let mut answers = HashMap::new();
        let mut seen = HashSet::new();

        for (key, value) in fields {
            let id_part = key.strip_prefix('q').unwrap_or(key);
            let Ok(question_id) = id_part.parse::<i64>() else {
                continue;
            };
            if !seen.insert(question_id) {
                return Err(AppError::ValidationError(format!(
                    "Question {} was answered more than once",
                    question_id
                )));
            }

            let value = value.trim();
            if value.is_empty() {
                continue;
            }

            let index = value.parse::<usize>().map_err(|_| {
                AppError::ValidationError(format!(
                    "Answer for question {} must be an option index, got '{}'",
                    question_id, value
                ))
            })?;
            answers.insert(question_id, index);
        }

        Ok(Self { answers })
    }
}

impl FromIterator<(i64, usize)> for Submission {
    fn from_iter<I: IntoIterator<Item = (i64, usize)>>(iter: I) -> Self {
        Self {
            answers: iter.into_iter().collect(),
        }
    }
}

/// Submitted-versus-correct comparison for one question.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionFeedback {
    pub id: i64,
    pub text: &'static str,
    pub options: &'static [&'static str],
    pub submitted: Option<usize>,
    pub correct_index: usize,
    pub is_correct: bool,
}

/// Result of a graded attempt. The only place per-question feedback is produced.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptReport {
    pub username: String,
    pub score: i64,
    pub total: usize,
    pub pass_mark: i64,
    pub passed: bool,
    pub status: AccountStatus,
    pub questions: Vec<QuestionFeedback>,
    pub started_at: Option<DateTime<Utc>>,
    pub deadline: Option<DateTime<Utc>>,
    /// Advisory: the attempt was submitted after its deadline. Never affects scoring.
    pub submitted_late: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_form_accepts_both_key_styles() {
        let submission = Submission::from_form(&fields(&[("q1", "0"), ("2", "3")])).unwrap();
        assert_eq!(submission.selected(1), Some(0));
        assert_eq!(submission.selected(2), Some(3));
        assert_eq!(submission.len(), 2);
    }

    #[test]
    fn test_from_form_skips_blank_and_unrelated_fields() {
        let submission =
            Submission::from_form(&fields(&[("q1", ""), ("csrf", "abc"), ("q4", " 1 ")])).unwrap();
        assert_eq!(submission.selected(1), None);
        assert_eq!(submission.selected(4), Some(1));
        assert_eq!(submission.len(), 1);
    }

    #[test]
    fn test_from_form_rejects_non_numeric_answer() {
        let result = Submission::from_form(&fields(&[("q1", "def")]));
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_from_form_rejects_question_named_twice() {
        let result = Submission::from_form(&fields(&[("q1", "0"), ("1", "3")]));
        assert!(matches!(result, Err(AppError::ValidationError(_))));

        // Even when one of the two is blank.
        let result = Submission::from_form(&fields(&[("q2", ""), ("2", "1")]));
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
