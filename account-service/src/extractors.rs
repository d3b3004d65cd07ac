use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header::AUTHORIZATION, request::Parts};
use common_auth::{AuthError, AuthResult, Claims, Identity, TokenKind};
use tracing::debug;

use crate::app::AppState;

/// Verified caller attached to the request after the token passes both
/// signature verification and the revocation check.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub claims: Claims,
    pub token: String,
}

impl AuthContext {
    pub fn identity(&self) -> Identity {
        self.claims.identity()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app = AppState::from_ref(state);

        let header_value = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthorization)?;

        let token = parse_bearer(header_value)?;
        let claims = app.signer.verify(&token, TokenKind::Access)?;

        // Blacklist lookup happens strictly after signature verification so
        // malformed tokens never reach the store.
        let revoked = app
            .revocation
            .is_blacklisted(&token)
            .await
            .map_err(|err| AuthError::StoreUnavailable(err.to_string()))?;
        if revoked {
            debug!(subject = %claims.subject, "rejected blacklisted token");
            return Err(AuthError::Revoked);
        }

        Ok(Self { claims, token })
    }
}

fn parse_bearer(value: &axum::http::HeaderValue) -> AuthResult<String> {
    let raw = value
        .to_str()
        .map_err(|_| AuthError::InvalidAuthorization)?
        .trim();

    let token = raw
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthorization)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::InvalidAuthorization);
    }

    Ok(token.to_owned())
}
