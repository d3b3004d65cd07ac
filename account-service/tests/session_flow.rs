mod support;

use std::time::Duration;

use account_service::revocation::RevocationStore;
use anyhow::Result;
use axum::http::StatusCode;
use common_auth::TokenKind;
use serde_json::json;
use support::{build_app, post_json, seed_account, TestApp, ACCESS_TTL};

const LOGIN_URI: &str = "/api/v1/session/login";
const REFRESH_URI: &str = "/api/v1/session/refreshToken";
const LOGOUT_URI: &str = "/api/v1/session/logout";
const CREATE_URI: &str = "/api/v1/admin/createAccount";

async fn login(harness: &TestApp, email: &str, password: &str) -> Result<(String, String)> {
    let (status, body) = post_json(
        &harness.app,
        LOGIN_URI,
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["message"], json!("Succesful Login! 😊"));

    let access = body["data"]["accessToken"].as_str().unwrap().to_string();
    let refresh = body["data"]["refreshToken"].as_str().unwrap().to_string();
    Ok((access, refresh))
}

#[tokio::test]
async fn login_issues_tokens_and_records_refresh() -> Result<()> {
    let harness = build_app();
    let account = seed_account(&harness.users, "admin@test.com", "123456", "admin").await?;

    let (access, refresh) = login(&harness, "admin@test.com", "123456").await?;

    let access_claims = harness.signer.verify(&access, TokenKind::Access)?;
    assert_eq!(access_claims.subject, account.id);
    assert_eq!(access_claims.role, "admin");

    let refresh_claims = harness.signer.verify(&refresh, TokenKind::Refresh)?;
    assert_eq!(refresh_claims.subject, account.id);

    let stored = harness.revocation.get_refresh(account.id).await?;
    assert_eq!(stored.as_deref(), Some(refresh.as_str()));
    Ok(())
}

#[tokio::test]
async fn login_with_wrong_password_is_rejected() -> Result<()> {
    let harness = build_app();
    seed_account(&harness.users, "admin@test.com", "123456", "admin").await?;

    let (status, body) = post_json(
        &harness.app,
        LOGIN_URI,
        None,
        Some(json!({ "email": "admin@test.com", "password": "654321" })),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));
    Ok(())
}

#[tokio::test]
async fn refresh_without_token_is_rejected() -> Result<()> {
    let harness = build_app();

    let (status, body) = post_json(&harness.app, REFRESH_URI, None, Some(json!({}))).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({ "success": false, "message": "Refresh token unavailable" })
    );
    Ok(())
}

#[tokio::test]
async fn refresh_rotates_and_invalidates_previous_token() -> Result<()> {
    let harness = build_app();
    seed_account(&harness.users, "admin@test.com", "123456", "admin").await?;
    let (_, refresh) = login(&harness, "admin@test.com", "123456").await?;

    let (status, body) = post_json(
        &harness.app,
        REFRESH_URI,
        None,
        Some(json!({ "refreshToken": refresh })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    let rotated = body["data"]["refreshToken"].as_str().unwrap().to_string();
    assert_ne!(rotated, refresh);

    // The overwritten record no longer matches the first token.
    let (status, body) = post_json(
        &harness.app,
        REFRESH_URI,
        None,
        Some(json!({ "refreshToken": refresh })),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], json!("Invalid token"));

    // The rotated one still works.
    let (status, _) = post_json(
        &harness.app,
        REFRESH_URI,
        None,
        Some(json!({ "refreshToken": rotated })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn access_token_is_not_accepted_as_refresh_token() -> Result<()> {
    let harness = build_app();
    seed_account(&harness.users, "admin@test.com", "123456", "admin").await?;
    let (access, _) = login(&harness, "admin@test.com", "123456").await?;

    let (status, body) = post_json(
        &harness.app,
        REFRESH_URI,
        None,
        Some(json!({ "refreshToken": access })),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));
    Ok(())
}

#[tokio::test]
async fn logout_revokes_access_and_drops_refresh() -> Result<()> {
    let harness = build_app();
    let account = seed_account(&harness.users, "admin@test.com", "123456", "admin").await?;
    let (access, refresh) = login(&harness, "admin@test.com", "123456").await?;

    let (status, body) = post_json(&harness.app, LOGOUT_URI, Some(&access), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": true, "data": "Succesful Logout! 🛫" })
    );

    // Blacklist entry lives at most as long as the token itself.
    let remaining = harness
        .revocation
        .remaining_blacklist_ttl(&access)
        .await
        .expect("blacklist entry present");
    assert!(remaining <= Duration::from_secs(ACCESS_TTL as u64));

    // The still-unexpired access token is now refused.
    let (status, body) = post_json(
        &harness.app,
        CREATE_URI,
        Some(&access),
        Some(json!({
            "name": "Testing User",
            "email": "test@test.com",
            "password": "123456",
            "role": "user",
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], json!("Invalid token"));

    // The refresh record is gone too.
    assert!(harness.revocation.get_refresh(account.id).await?.is_none());
    let (status, body) = post_json(
        &harness.app,
        REFRESH_URI,
        None,
        Some(json!({ "refreshToken": refresh })),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], json!("Invalid token"));
    Ok(())
}

#[tokio::test]
async fn logout_requires_authentication() -> Result<()> {
    let harness = build_app();

    let (status, body) = post_json(&harness.app, LOGOUT_URI, None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "success": false, "message": "No auth token" }));
    Ok(())
}
