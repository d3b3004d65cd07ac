use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use common_auth::TokenKind;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::extractors::AuthContext;
use crate::messages;
use crate::response::{success, ApiError};
use crate::users::verify_password;
use crate::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// `POST /api/v1/session/login`. Issues an access/refresh pair and records
/// the refresh token as the user's single active one.
pub async fn login(
    State(state): State<AppState>,
    Json(login): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let account = state
        .users
        .find_by_email(&login.email)
        .await
        .map_err(|err| ApiError::storage(err.to_string()))?;

    let account = match account {
        Some(account) => account,
        None => return Err(ApiError::unauthorized(messages::INVALID_CREDENTIALS)),
    };

    if !verify_password(&login.password, &account.password_hash) {
        warn!(account_id = %account.id, "login with invalid password");
        return Err(ApiError::unauthorized(messages::INVALID_CREDENTIALS));
    }

    let (access_token, refresh_token) = issue_pair(&state, account.id, &account.role).await?;

    info!(account_id = %account.id, "login succeeded");
    Ok(success(
        StatusCode::OK,
        json!({
            "accessToken": access_token,
            "refreshToken": refresh_token,
            "message": messages::SUCCESS_LOGIN,
        }),
    ))
}

/// `POST /api/v1/session/refreshToken`. The presented token must match the
/// stored record for its subject; on success both tokens rotate and the
/// stored record is overwritten.
pub async fn refresh_token(
    State(state): State<AppState>,
    body: Option<Json<RefreshRequest>>,
) -> Result<Response, ApiError> {
    let raw = body
        .and_then(|Json(request)| request.refresh_token)
        .filter(|token| !token.trim().is_empty());
    let raw = match raw {
        Some(raw) => raw,
        None => return Err(ApiError::unauthorized(messages::EMPTY_TOKEN)),
    };

    let claims = state
        .signer
        .verify(&raw, TokenKind::Refresh)
        .map_err(|err| ApiError::unauthorized(err.to_string()))?;

    let stored = state
        .revocation
        .get_refresh(claims.subject)
        .await
        .map_err(|err| ApiError::storage(err.to_string()))?;
    if stored.as_deref() != Some(raw.as_str()) {
        warn!(subject = %claims.subject, "refresh token does not match stored record");
        return Err(ApiError::unauthorized(messages::INVALID_TOKEN));
    }

    let (access_token, refresh_token) = issue_pair(&state, claims.subject, &claims.role).await?;

    Ok(success(
        StatusCode::OK,
        json!({
            "accessToken": access_token,
            "refreshToken": refresh_token,
        }),
    ))
}

/// `POST /api/v1/session/logout`. Blacklists the presenting access token
/// for its remaining lifetime and drops the user's refresh record.
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Response, ApiError> {
    let remaining = auth.claims.remaining_ttl_seconds(Utc::now());
    state
        .revocation
        .blacklist(&auth.token, remaining)
        .await
        .map_err(|err| ApiError::storage(err.to_string()))?;
    state
        .revocation
        .delete_refresh(auth.claims.subject)
        .await
        .map_err(|err| ApiError::storage(err.to_string()))?;

    info!(subject = %auth.claims.subject, "logout, access token revoked");
    Ok(success(StatusCode::OK, messages::SUCCESS_LOGOUT))
}

async fn issue_pair(
    state: &AppState,
    subject: Uuid,
    role: &str,
) -> Result<(String, String), ApiError> {
    let access = state
        .signer
        .issue(subject, role, TokenKind::Access)
        .map_err(|err| ApiError::storage(err.to_string()))?;
    let refresh = state
        .signer
        .issue(subject, role, TokenKind::Refresh)
        .map_err(|err| ApiError::storage(err.to_string()))?;

    state
        .revocation
        .set_refresh(
            subject,
            &refresh,
            state.signer.config().ttl_seconds(TokenKind::Refresh),
        )
        .await
        .map_err(|err| ApiError::storage(err.to_string()))?;

    Ok((access, refresh))
}
