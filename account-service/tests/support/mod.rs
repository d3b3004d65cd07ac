#![allow(dead_code)]

use std::sync::Arc;

use account_service::revocation::{InMemoryRevocationStore, RevocationStore};
use account_service::users::{hash_password, Account, InMemoryUserStore, NewAccount, UserStore};
use account_service::{router, AppState};
use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use common_auth::{TokenConfig, TokenSigner};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::util::ServiceExt;

pub const ACCESS_KEY: &str = "accesskey";
pub const REFRESH_KEY: &str = "refreshkey";
pub const ACCESS_TTL: i64 = 600;
pub const REFRESH_TTL: i64 = 7200;

pub struct TestApp {
    pub app: Router,
    pub signer: Arc<TokenSigner>,
    pub revocation: Arc<InMemoryRevocationStore>,
    pub users: Arc<InMemoryUserStore>,
}

pub fn token_config() -> TokenConfig {
    TokenConfig::new(ACCESS_KEY, REFRESH_KEY).with_ttls(ACCESS_TTL, REFRESH_TTL)
}

pub fn build_app() -> TestApp {
    let signer = Arc::new(TokenSigner::new(token_config()));
    let revocation = Arc::new(InMemoryRevocationStore::new());
    let users = Arc::new(InMemoryUserStore::new());

    let state = AppState {
        signer: signer.clone(),
        revocation: revocation.clone() as Arc<dyn RevocationStore>,
        users: users.clone() as Arc<dyn UserStore>,
    };

    TestApp {
        app: router(state),
        signer,
        revocation,
        users,
    }
}

pub async fn seed_account(
    users: &InMemoryUserStore,
    email: &str,
    password: &str,
    role: &str,
) -> Result<Account> {
    let account = users
        .insert(NewAccount {
            name: "Seeded Account".to_string(),
            email: email.to_string(),
            password_hash: hash_password(password)?,
            role: role.to_string(),
            photo: None,
            about_me: None,
        })
        .await?;
    Ok(account)
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, json))
}
