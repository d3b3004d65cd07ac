use axum::http::StatusCode;
use common_auth::Identity;

use crate::messages;
use crate::response::ApiError;

#[derive(Debug, Clone)]
pub enum GuardError {
    Forbidden,
}

impl From<GuardError> for ApiError {
    fn from(value: GuardError) -> Self {
        match value {
            GuardError::Forbidden => {
                ApiError::message(StatusCode::FORBIDDEN, messages::ACCESS_DENIED)
            }
        }
    }
}

/// Role gate applied after authentication. The allowed set is declared at
/// each protected route's call site, not globally.
pub fn ensure_role(identity: &Identity, allowed: &[&str]) -> Result<(), GuardError> {
    if allowed.is_empty() {
        return Ok(());
    }

    if allowed.iter().any(|required| identity.role == *required) {
        Ok(())
    } else {
        Err(GuardError::Forbidden)
    }
}
