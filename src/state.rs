use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    config::Config,
    services::{AccountService, AssessmentEngine, AttemptLifecycle},
    store::UserRecordStore,
};

#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub lifecycle: AttemptLifecycle,
    pub config: Config,
}

impl AppState {
    /// Wires the services over one store and the configured engine.
    pub fn new(store: Arc<dyn UserRecordStore>, config: Config) -> Self {
        let engine = Arc::new(AssessmentEngine::from_config(&config));
        Self {
            accounts: AccountService::new(store.clone()),
            lifecycle: AttemptLifecycle::new(store, engine),
            config,
        }
    }
}

impl FromRef<AppState> for AccountService {
    fn from_ref(state: &AppState) -> Self {
        state.accounts.clone()
    }
}

impl FromRef<AppState> for AttemptLifecycle {
    fn from_ref(state: &AppState) -> Self {
        state.lifecycle.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
