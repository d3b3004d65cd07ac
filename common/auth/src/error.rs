use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    /// No Authorization header, or the value carries no bearer token.
    #[error("No auth token")]
    MissingAuthorization,
    #[error("No auth token")]
    InvalidAuthorization,
    /// Token could not be decoded with the expected key/format, including a
    /// decode that yields a null or unusable claims payload.
    #[error("{0}")]
    MalformedToken(String),
    #[error("{0}")]
    ExpiredToken(String),
    #[error("{0}")]
    InvalidSignature(String),
    #[error("invalid claim '{0}' with value '{1}'")]
    InvalidClaim(&'static str, String),
    /// Token verified but is present in the revocation blacklist.
    #[error("Invalid token")]
    Revoked,
    /// Revocation store unreachable. Fail closed, never allow access.
    #[error("{0}")]
    StoreUnavailable(String),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(value: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match value.kind() {
            ErrorKind::ExpiredSignature => Self::ExpiredToken(value.to_string()),
            ErrorKind::InvalidSignature => Self::InvalidSignature(value.to_string()),
            _ => Self::MalformedToken(value.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        };

        let body = ErrorBody {
            success: false,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
