use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::claims::Claims;
use crate::config::TokenConfig;
use crate::error::{AuthError, AuthResult};

/// The two token lifetimes the service issues. Each kind is signed with its
/// own secret so one can never be verified as the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

/// Signs and verifies both token kinds. Stateless: output depends only on
/// the configured secrets, TTLs, and the clock.
#[derive(Clone)]
pub struct TokenSigner {
    config: TokenConfig,
    access: KeyPair,
    refresh: KeyPair,
}

#[derive(Clone)]
struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

#[derive(Serialize)]
struct TokenPayload<'a> {
    id: String,
    role: &'a str,
    iat: i64,
    exp: i64,
}

impl TokenSigner {
    pub fn new(config: TokenConfig) -> Self {
        let access = KeyPair::from_secret(config.key(TokenKind::Access));
        let refresh = KeyPair::from_secret(config.key(TokenKind::Refresh));
        Self {
            config,
            access,
            refresh,
        }
    }

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    fn keys(&self, kind: TokenKind) -> &KeyPair {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    /// Issue a signed token for `subject` with issued-at = now and
    /// expiry = now + the kind's configured TTL.
    pub fn issue(&self, subject: Uuid, role: &str, kind: TokenKind) -> AuthResult<String> {
        let now = Utc::now();
        let expires_at = now + Duration::seconds(self.config.ttl_seconds(kind));

        let payload = TokenPayload {
            id: subject.to_string(),
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::default(), &payload, &self.keys(kind).encoding)?;
        debug!(kind = kind.as_str(), %subject, "issued token");
        Ok(token)
    }

    /// Verify a raw token against the given kind's secret and return its
    /// claims. Decodes to a raw JSON payload first so a structurally valid
    /// JWT with a null or incomplete payload is reported as malformed
    /// rather than panicking on a missing field.
    pub fn verify(&self, token: &str, kind: TokenKind) -> AuthResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.config.leeway_seconds.into();

        let token_data = decode::<Value>(token, &self.keys(kind).decoding, &validation)?;
        let claims = Claims::try_from(token_data.claims)?;

        // jsonwebtoken's exp check is strict-less-than, which would accept a
        // token presented at exactly its expiry second. Validity ends at exp.
        let cutoff = claims.expires_at + Duration::seconds(i64::from(self.config.leeway_seconds));
        if Utc::now() >= cutoff {
            return Err(AuthError::ExpiredToken("ExpiredSignature".to_string()));
        }

        debug!(kind = kind.as_str(), subject = %claims.subject, "verified token");
        Ok(claims)
    }
}
