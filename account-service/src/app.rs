use std::sync::Arc;

use axum::extract::FromRef;
use axum::routing::{get, post};
use axum::Router;
use common_auth::TokenSigner;

use crate::account_handlers::create_account;
use crate::revocation::RevocationStore;
use crate::session_handlers::{login, logout, refresh_token};
use crate::users::UserStore;

/// Shared application state. Only read-only configuration and store
/// handles; requests share no other mutable in-process state.
#[derive(Clone)]
pub struct AppState {
    pub signer: Arc<TokenSigner>,
    pub revocation: Arc<dyn RevocationStore>,
    pub users: Arc<dyn UserStore>,
}

impl FromRef<AppState> for Arc<TokenSigner> {
    fn from_ref(state: &AppState) -> Self {
        state.signer.clone()
    }
}

async fn health() -> &'static str {
    "ok"
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .route("/api/v1/admin/createAccount", post(create_account))
        .route("/api/v1/session/login", post(login))
        .route("/api/v1/session/refreshToken", post(refresh_token))
        .route("/api/v1/session/logout", post(logout))
        .with_state(state)
}
