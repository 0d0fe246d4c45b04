// src/models/account.rs

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::error::AppError;

/// Assessment progress of an account.
///
/// `Passed` is terminal: nothing reachable through the public interface
/// moves an account out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    New,
    Failed,
    Passed,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::New => "new",
            AccountStatus::Failed => "failed",
            AccountStatus::Passed => "passed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AccountStatus::Passed)
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(AccountStatus::New),
            "failed" => Ok(AccountStatus::Failed),
            "passed" => Ok(AccountStatus::Passed),
            other => Err(AppError::InternalServerError(format!(
                "unknown account status '{}'",
                other
            ))),
        }
    }
}

/// One row of the `accounts` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    /// Case-normalized username, the natural key.
    pub username: String,

    /// Argon2 PHC hash of the credential.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub credential: String,

    pub status: AccountStatus,

    /// Score of the last completed attempt, kept across restarts.
    pub last_score: Option<i64>,
}

/// Raw row as SQLite returns it; `status` is validated on conversion.
#[derive(Debug, FromRow)]
pub struct AccountRow {
    pub username: String,
    pub credential: String,
    pub status: String,
    pub last_score: Option<i64>,
}

impl TryFrom<AccountRow> for Account {
    type Error = AppError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            username: row.username,
            credential: row.credential,
            status: row.status.parse()?,
            last_score: row.last_score,
        })
    }
}

/// Trims and case-folds a username.
pub fn normalize_username(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Form fields posted to `/register` and `/login`.
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default, alias = "password")]
    pub credential: String,
}

/// Normalized registration input, validated before anything is stored.
#[derive(Debug, Validate)]
pub struct NewAccount {
    #[validate(length(
        min = 1,
        max = 64,
        message = "Username is required and must be at most 64 characters."
    ))]
    pub username: String,
    #[validate(length(
        min = 1,
        max = 256,
        message = "Password is required and must be at most 256 characters."
    ))]
    pub credential: String,
}

impl NewAccount {
    pub fn normalized(username: &str, credential: &str) -> Self {
        Self {
            username: normalize_username(username),
            credential: credential.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_username() {
        assert_eq!(normalize_username("  Alice "), "alice");
        assert_eq!(normalize_username("BOB"), "bob");
        assert_eq!(normalize_username("   "), "");
    }

    #[test]
    fn test_status_round_trips_through_text() {
        for status in [AccountStatus::New, AccountStatus::Failed, AccountStatus::Passed] {
            assert_eq!(status.as_str().parse::<AccountStatus>().unwrap(), status);
        }
        assert!("archived".parse::<AccountStatus>().is_err());
    }

    #[test]
    fn test_new_account_rejects_blank_fields() {
        assert!(NewAccount::normalized("  ", "secret").validate().is_err());
        assert!(NewAccount::normalized("carol", "   ").validate().is_err());
        assert!(NewAccount::normalized(" Carol ", " secret ").validate().is_ok());
    }

    #[test]
    fn test_credential_is_not_serialized() {
        let account = Account {
            username: "dave".into(),
            credential: "$argon2id$...".into(),
            status: AccountStatus::New,
            last_score: None,
        };
        let json = serde_json::to_value(&account).unwrap();
        assert!(json.get("credential").is_none());
        assert_eq!(json["status"], "new");
    }
}
