use std::collections::HashMap;
use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use rand_core::OsRng;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub photo: Option<String>,
    pub about_me: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub photo: Option<String>,
    pub about_me: Option<String>,
}

#[derive(Debug, Error)]
pub enum UserStoreError {
    /// Message passes through to the 500 response body unchanged.
    #[error("{0}")]
    Storage(String),
}

impl From<sqlx::Error> for UserStoreError {
    fn from(value: sqlx::Error) -> Self {
        Self::Storage(value.to_string())
    }
}

/// Lookup/insert surface over persistent account storage.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, UserStoreError>;
    async fn insert(&self, account: NewAccount) -> Result<Account, UserStoreError>;
}

pub fn hash_password(password: &str) -> Result<String, UserStoreError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| UserStoreError::Storage(format!("Failed to hash password: {err}")))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

// ---------------- Postgres Implementation ----------------

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, UserStoreError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, name, email, role, password_hash, photo, about_me
             FROM accounts WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, UserStoreError> {
        let created = sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (id, name, email, role, password_hash, photo, about_me)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id, name, email, role, password_hash, photo, about_me",
        )
        .bind(Uuid::new_v4())
        .bind(account.name)
        .bind(account.email)
        .bind(account.role)
        .bind(account.password_hash)
        .bind(account.photo)
        .bind(account.about_me)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }
}

// ---------------- In-Memory Implementation (Tests) ----------------

#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    accounts: Arc<Mutex<HashMap<String, Account>>>,
    fail_message: Arc<Mutex<Option<String>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `message`, for exercising the
    /// storage-error path.
    pub async fn fail_with(&self, message: impl Into<String>) {
        *self.fail_message.lock().await = Some(message.into());
    }

    async fn check_failure(&self) -> Result<(), UserStoreError> {
        match self.fail_message.lock().await.as_ref() {
            Some(message) => Err(UserStoreError::Storage(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, UserStoreError> {
        self.check_failure().await?;
        let guard = self.accounts.lock().await;
        Ok(guard.get(email).cloned())
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, UserStoreError> {
        self.check_failure().await?;
        let created = Account {
            id: Uuid::new_v4(),
            name: account.name,
            email: account.email.clone(),
            role: account.role,
            password_hash: account.password_hash,
            photo: account.photo,
            about_me: account.about_me,
        };
        let mut guard = self.accounts.lock().await;
        guard.insert(account.email, created.clone());
        Ok(created)
    }
}
