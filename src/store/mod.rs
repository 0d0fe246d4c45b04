//! Durable account storage.

mod sqlite;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::account::{Account, AccountStatus},
};

pub use sqlite::SqliteUserStore;

/// Storage operations for account rows.
///
/// Every operation touches exactly one row and is atomic with respect to it.
/// No listing operation is exposed.
#[async_trait]
pub trait UserRecordStore: Send + Sync {
    /// Look up an account by its normalized username.
    async fn find(&self, username: &str) -> Result<Option<Account>, AppError>;

    /// Insert a new account with status `new` and no score.
    /// Fails with `DuplicateAccount` if the username is taken.
    async fn create(&self, username: &str, credential_hash: &str) -> Result<Account, AppError>;

    /// Overwrite status and score. Fails with `AccountNotFound` if there is no such row.
    async fn set_outcome(
        &self,
        username: &str,
        status: AccountStatus,
        score: Option<i64>,
    ) -> Result<(), AppError>;

    /// Overwrite status and score unless the account has already passed.
    ///
    /// The guard and the write are one statement, so a concurrent pass can
    /// never be overwritten. Fails with `StateViolation` when the row is
    /// passed and `AccountNotFound` when it does not exist.
    async fn set_outcome_unless_passed(
        &self,
        username: &str,
        status: AccountStatus,
        score: Option<i64>,
    ) -> Result<(), AppError>;
}
