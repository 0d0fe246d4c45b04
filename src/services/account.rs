// src/services/account.rs

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::AppError,
    models::account::{Account, NewAccount, normalize_username},
    store::UserRecordStore,
    utils::hash::{hash_credential, verify_against_decoy, verify_credential},
};

const INVALID_CREDENTIALS: &str = "Invalid username or password!";

/// Registration and credential verification.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn UserRecordStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn UserRecordStore>) -> Self {
        Self { store }
    }

    /// Registers a new account with status `new` and no score.
    ///
    /// Username is trimmed and case-folded. Registration reports a taken
    /// username as `DuplicateAccount`, unlike `authenticate`.
    pub async fn register(&self, username: &str, credential: &str) -> Result<Account, AppError> {
        let new_account = NewAccount::normalized(username, credential);
        new_account.validate()?;

        if self.store.find(&new_account.username).await?.is_some() {
            tracing::debug!("Registration rejected, '{}' exists", new_account.username);
            return Err(AppError::DuplicateAccount(
                "Username already exists!".to_string(),
            ));
        }

        let credential_hash = hash_credential(&new_account.credential)?;
        // The store re-checks uniqueness, so a concurrent registration still
        // surfaces as DuplicateAccount.
        let account = self
            .store
            .create(&new_account.username, &credential_hash)
            .await?;

        tracing::info!("Registered account '{}'", account.username);
        Ok(account)
    }

    pub async fn lookup(&self, username: &str) -> Result<Option<Account>, AppError> {
        self.store.find(&normalize_username(username)).await
    }

    /// Verifies credentials and returns the account.
    ///
    /// Unknown usernames and wrong credentials both fail with the same `AuthError`.
    pub async fn authenticate(&self, username: &str, credential: &str) -> Result<Account, AppError> {
        let username = normalize_username(username);
        let credential = credential.trim();

        let Some(account) = self.store.find(&username).await? else {
            verify_against_decoy(credential);
            tracing::debug!("Login for unknown account '{}'", username);
            return Err(AppError::AuthError(INVALID_CREDENTIALS.to_string()));
        };

        if !verify_credential(credential, &account.credential)? {
            tracing::debug!("Wrong credential for '{}'", username);
            return Err(AppError::AuthError(INVALID_CREDENTIALS.to_string()));
        }

        tracing::info!("Authenticated '{}'", account.username);
        Ok(account)
    }
}
