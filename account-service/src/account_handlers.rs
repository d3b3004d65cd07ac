use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use common_auth::{ROLE_ADMIN, VALID_ROLES};
use serde_json::Value;
use tracing::info;

use crate::extractors::AuthContext;
use crate::guards::ensure_role;
use crate::messages;
use crate::response::{success, ApiError};
use crate::users::{hash_password, NewAccount};
use crate::AppState;

const NAME_RULE: &str = "'name' is required and must exceed 5 characters";
const EMAIL_RULE: &str = "Invalid email address";
const PASSWORD_RULE: &str = "'password' is required and must exceed 5 characters";
const ROLE_RULE: &str = "'role' is required and must have a valid value";

const MIN_FIELD_LENGTH: usize = 6;

/// `POST /api/v1/admin/createAccount`. Admin-only; validates the payload,
/// rejects duplicate emails, then persists the account.
pub async fn create_account(
    State(state): State<AppState>,
    auth: AuthContext,
    body: Option<Json<Value>>,
) -> Result<Response, ApiError> {
    ensure_role(&auth.identity(), &[ROLE_ADMIN])?;

    let payload = body.map(|Json(value)| value).unwrap_or(Value::Null);
    let validated = validate_payload(&payload).map_err(ApiError::validation)?;

    let existing = state
        .users
        .find_by_email(&validated.email)
        .await
        .map_err(|err| ApiError::storage(err.to_string()))?;
    if existing.is_some() {
        return Err(ApiError::conflict(messages::EXISTING_EMAIL));
    }

    let password_hash =
        hash_password(&validated.password).map_err(|err| ApiError::storage(err.to_string()))?;

    let account = state
        .users
        .insert(NewAccount {
            name: validated.name,
            email: validated.email,
            password_hash,
            role: validated.role,
            photo: validated.photo,
            about_me: validated.about_me,
        })
        .await
        .map_err(|err| ApiError::storage(err.to_string()))?;

    info!(account_id = %account.id, created_by = %auth.claims.subject, "account created");
    Ok(success(StatusCode::CREATED, messages::ACCOUNT_CREATED))
}

#[derive(Debug)]
struct ValidPayload {
    name: String,
    email: String,
    password: String,
    role: String,
    photo: Option<String>,
    about_me: Option<String>,
}

/// Checks the raw JSON body field by field so a wrong-typed value (for
/// example a numeric password) counts as a violation instead of aborting
/// deserialization. Violations are collected in a fixed order: name,
/// email, password, role.
fn validate_payload(payload: &Value) -> Result<ValidPayload, Vec<String>> {
    let mut errors = Vec::new();

    let name = match string_field(payload, "name") {
        Some(value) if value.chars().count() >= MIN_FIELD_LENGTH => Some(value.to_string()),
        _ => {
            errors.push(NAME_RULE.to_string());
            None
        }
    };

    let email = match string_field(payload, "email") {
        Some(value) if is_valid_email(value) => Some(value.to_string()),
        _ => {
            errors.push(EMAIL_RULE.to_string());
            None
        }
    };

    let password = match string_field(payload, "password") {
        Some(value) if value.chars().count() >= MIN_FIELD_LENGTH => Some(value.to_string()),
        _ => {
            errors.push(PASSWORD_RULE.to_string());
            None
        }
    };

    let role = match string_field(payload, "role") {
        Some(value) if VALID_ROLES.contains(&value) => Some(value.to_string()),
        _ => {
            errors.push(ROLE_RULE.to_string());
            None
        }
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ValidPayload {
        name: name.unwrap(),
        email: email.unwrap(),
        password: password.unwrap(),
        role: role.unwrap(),
        photo: string_field(payload, "photo").map(str::to_string),
        about_me: string_field(payload, "aboutMe").map(str::to_string),
    })
}

fn string_field<'a>(payload: &'a Value, key: &str) -> Option<&'a str> {
    payload.get(key)?.as_str()
}

fn is_valid_email(value: &str) -> bool {
    let mut parts = value.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = match parts.next() {
        Some(domain) => domain,
        None => return false,
    };

    if local.is_empty() || domain.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }

    // Domain needs at least one dot with non-empty labels either side.
    domain.split('.').count() >= 2 && domain.split('.').all(|label| !label.is_empty())
}
