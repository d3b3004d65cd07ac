use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

/// Error half of the response envelope: either a single message or an
/// ordered list of field validation errors.
#[derive(Debug)]
pub enum ApiError {
    Message {
        status: StatusCode,
        message: String,
    },
    Validation {
        errors: Vec<String>,
    },
}

impl ApiError {
    pub fn message(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Message {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::message(StatusCode::UNAUTHORIZED, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::message(StatusCode::CONFLICT, message)
    }

    /// Storage-layer failures pass their original message through verbatim.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::message(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn validation(errors: Vec<String>) -> Self {
        Self::Validation { errors }
    }
}

#[derive(Debug, Serialize)]
struct MessageBody {
    success: bool,
    message: String,
}

#[derive(Debug, Serialize)]
struct FieldError {
    message: String,
}

#[derive(Debug, Serialize)]
struct ValidationBody {
    success: bool,
    errors: Vec<FieldError>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Message { status, message } => (
                status,
                Json(MessageBody {
                    success: false,
                    message,
                }),
            )
                .into_response(),
            ApiError::Validation { errors } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ValidationBody {
                    success: false,
                    errors: errors
                        .into_iter()
                        .map(|message| FieldError { message })
                        .collect(),
                }),
            )
                .into_response(),
        }
    }
}

pub fn success(status: StatusCode, data: impl Serialize) -> Response {
    (status, Json(json!({ "success": true, "data": data }))).into_response()
}
