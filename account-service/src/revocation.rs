use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Namespace for revoked access tokens, keeping them apart from the
/// per-user refresh records that share the same store.
pub const BLACKLIST_PREFIX: &str = "bl_";

fn blacklist_key(token: &str) -> String {
    format!("{BLACKLIST_PREFIX}{token}")
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("revocation store unavailable: {0}")]
    Unavailable(String),
}

impl From<redis::RedisError> for StoreError {
    fn from(value: redis::RedisError) -> Self {
        Self::Unavailable(value.to_string())
    }
}

/// Shared record of revoked access tokens and the single active refresh
/// token per user. Entries carry a TTL so the blacklist never grows past
/// the natural lifetime of the tokens it holds. An unreachable store must
/// surface as an error; callers fail the request rather than allow access.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Record `token` as revoked for `ttl_seconds` (its remaining
    /// lifetime). A non-positive TTL means the token is already past its
    /// expiry and nothing needs recording.
    async fn blacklist(&self, token: &str, ttl_seconds: i64) -> Result<(), StoreError>;

    async fn is_blacklisted(&self, token: &str) -> Result<bool, StoreError>;

    /// Store the current refresh token for `user_id`, replacing any
    /// previous one.
    async fn set_refresh(
        &self,
        user_id: Uuid,
        token: &str,
        ttl_seconds: i64,
    ) -> Result<(), StoreError>;

    async fn get_refresh(&self, user_id: Uuid) -> Result<Option<String>, StoreError>;

    async fn delete_refresh(&self, user_id: Uuid) -> Result<(), StoreError>;
}

// ---------------- Redis Implementation ----------------

#[derive(Clone)]
pub struct RedisRevocationStore {
    manager: ConnectionManager,
}

impl RedisRevocationStore {
    pub async fn new(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url).context("Failed to create Redis client")?;
        let manager = ConnectionManager::new(client)
            .await
            .context("Failed to create Redis connection manager")?;
        Ok(Self { manager })
    }
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn blacklist(&self, token: &str, ttl_seconds: i64) -> Result<(), StoreError> {
        if ttl_seconds <= 0 {
            return Ok(());
        }
        let key = blacklist_key(token);
        let mut conn = self.manager.clone();
        let _: () = conn.set(&key, 1).await?;
        let _: () = conn.expire(&key, ttl_seconds).await?;
        Ok(())
    }

    async fn is_blacklisted(&self, token: &str) -> Result<bool, StoreError> {
        let mut conn = self.manager.clone();
        let found: bool = conn.exists(blacklist_key(token)).await?;
        Ok(found)
    }

    async fn set_refresh(
        &self,
        user_id: Uuid,
        token: &str,
        ttl_seconds: i64,
    ) -> Result<(), StoreError> {
        if ttl_seconds <= 0 {
            return Ok(());
        }
        let key = user_id.to_string();
        let mut conn = self.manager.clone();
        let _: () = conn.set(&key, token).await?;
        let _: () = conn.expire(&key, ttl_seconds).await?;
        Ok(())
    }

    async fn get_refresh(&self, user_id: Uuid) -> Result<Option<String>, StoreError> {
        let mut conn = self.manager.clone();
        let token: Option<String> = conn.get(user_id.to_string()).await?;
        Ok(token)
    }

    async fn delete_refresh(&self, user_id: Uuid) -> Result<(), StoreError> {
        let mut conn = self.manager.clone();
        let _: () = conn.del(user_id.to_string()).await?;
        Ok(())
    }
}

// ---------------- In-Memory Implementation (Tests) ----------------

#[derive(Clone, Default)]
pub struct InMemoryRevocationStore {
    inner: Arc<Mutex<HashMap<String, Entry>>>,
}

struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining time before a blacklist entry lapses, if one is live.
    pub async fn remaining_blacklist_ttl(&self, token: &str) -> Option<Duration> {
        let guard = self.inner.lock().await;
        let entry = guard.get(&blacklist_key(token))?;
        entry.expires_at.checked_duration_since(Instant::now())
    }

    async fn put(&self, key: String, value: String, ttl_seconds: i64) {
        if ttl_seconds <= 0 {
            return;
        }
        let mut guard = self.inner.lock().await;
        guard.insert(
            key,
            Entry {
                value,
                expires_at: Instant::now() + Duration::from_secs(ttl_seconds as u64),
            },
        );
    }

    async fn fetch(&self, key: &str) -> Option<String> {
        let mut guard = self.inner.lock().await;
        let now = Instant::now();
        match guard.get(key) {
            Some(entry) if entry.live(now) => Some(entry.value.clone()),
            Some(_) => {
                guard.remove(key);
                None
            }
            None => None,
        }
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn blacklist(&self, token: &str, ttl_seconds: i64) -> Result<(), StoreError> {
        self.put(blacklist_key(token), "1".to_string(), ttl_seconds)
            .await;
        Ok(())
    }

    async fn is_blacklisted(&self, token: &str) -> Result<bool, StoreError> {
        Ok(self.fetch(&blacklist_key(token)).await.is_some())
    }

    async fn set_refresh(
        &self,
        user_id: Uuid,
        token: &str,
        ttl_seconds: i64,
    ) -> Result<(), StoreError> {
        self.put(user_id.to_string(), token.to_string(), ttl_seconds)
            .await;
        Ok(())
    }

    async fn get_refresh(&self, user_id: Uuid) -> Result<Option<String>, StoreError> {
        Ok(self.fetch(&user_id.to_string()).await)
    }

    async fn delete_refresh(&self, user_id: Uuid) -> Result<(), StoreError> {
        let mut guard = self.inner.lock().await;
        guard.remove(&user_id.to_string());
        Ok(())
    }
}

/// Always-failing store for exercising the fail-closed path.
#[derive(Clone, Default)]
pub struct UnavailableRevocationStore;

#[async_trait]
impl RevocationStore for UnavailableRevocationStore {
    async fn blacklist(&self, _token: &str, _ttl_seconds: i64) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn is_blacklisted(&self, _token: &str) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn set_refresh(
        &self,
        _user_id: Uuid,
        _token: &str,
        _ttl_seconds: i64,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn get_refresh(&self, _user_id: Uuid) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn delete_refresh(&self, _user_id: Uuid) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}
