use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use tracing::error;

use chirp_db::{AccountStore, MessageStore};
use chirp_types::Account;
use chirp_types::api::Credentials;

use crate::account_manager::AccountManager;
use crate::error::{ApiError, ServiceError};
use crate::message_manager::MessageManager;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub accounts: AccountManager,
    pub messages: MessageManager,
}

impl AppStateInner {
    /// Wires both managers to the given stores.
    pub fn new(accounts: Arc<dyn AccountStore>, messages: Arc<dyn MessageStore>) -> AppState {
        Arc::new(Self {
            accounts: AccountManager::new(accounts.clone()),
            messages: MessageManager::new(messages, accounts),
        })
    }
}

/// Runs a manager call on the blocking pool; stores are synchronous.
pub(crate) async fn run_blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&AppStateInner) -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    let result = tokio::task::spawn_blocking(move || f(&state))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal
        })?;
    Ok(result?)
}

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<Account>, ApiError> {
    let Json(req) = payload?;
    let account = run_blocking(&state, move |s| s.accounts.register(&req)).await?;
    Ok(Json(account))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<Account>, ApiError> {
    let Json(req) = payload?;
    let account = run_blocking(&state, move |s| s.accounts.login(&req)).await?;
    Ok(Json(account))
}
