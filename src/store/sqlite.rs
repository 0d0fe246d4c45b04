use std::{path::Path, time::Duration};

use async_trait::async_trait;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};

use super::UserRecordStore;
use crate::{
    error::AppError,
    models::account::{Account, AccountRow, AccountStatus},
};

/// `UserRecordStore` backed by a SQLite database file.
#[derive(Clone)]
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (or creates) the database file and applies migrations.
    pub async fn open(path: &Path) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::StorageUnavailable(format!("cannot open {}: {}", path.display(), e))
            })?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Single-connection in-memory database, for tests and throwaway runs.
    pub async fn in_memory() -> Result<Self, AppError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| AppError::StorageUnavailable(e.to_string()))?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    async fn exists(&self, username: &str) -> Result<bool, AppError> {
        let found: Option<(String,)> =
            sqlx::query_as("SELECT username FROM accounts WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
        Ok(found.is_some())
    }
}

#[async_trait]
impl UserRecordStore for SqliteUserStore {
    async fn find(&self, username: &str) -> Result<Option<Account>, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT username, credential, status, last_score
            FROM accounts
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch account: {:?}", e);
            AppError::from(e)
        })?;

        row.map(Account::try_from).transpose()
    }

    async fn create(&self, username: &str, credential_hash: &str) -> Result<Account, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts (username, credential, status, last_score)
            VALUES (?, ?, 'new', NULL)
            RETURNING username, credential, status, last_score
            "#,
        )
        .bind(username)
        .bind(credential_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let unique = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if unique {
                AppError::DuplicateAccount("Username already exists!".to_string())
            } else {
                tracing::error!("Failed to create account: {:?}", e);
                AppError::from(e)
            }
        })?;

        Account::try_from(row)
    }

    async fn set_outcome(
        &self,
        username: &str,
        status: AccountStatus,
        score: Option<i64>,
    ) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE accounts SET status = ?, last_score = ? WHERE username = ?")
            .bind(status.as_str())
            .bind(score)
            .bind(username)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update account outcome: {:?}", e);
                AppError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::AccountNotFound(format!(
                "No account named '{}'",
                username
            )));
        }
        Ok(())
    }

    async fn set_outcome_unless_passed(
        &self,
        username: &str,
        status: AccountStatus,
        score: Option<i64>,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET status = ?, last_score = ?
            WHERE username = ? AND status != 'passed'
            "#,
        )
        .bind(status.as_str())
        .bind(score)
        .bind(username)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update account outcome: {:?}", e);
            AppError::from(e)
        })?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        // Nothing matched: tell a missing row apart from a passed one.
        if self.exists(username).await? {
            Err(AppError::StateViolation(
                "Assessment already passed".to_string(),
            ))
        } else {
            Err(AppError::AccountNotFound(format!(
                "No account named '{}'",
                username
            )))
        }
    }
}
