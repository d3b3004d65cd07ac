use crate::signer::TokenKind;

/// Runtime configuration for token signing and verification.
///
/// Access and refresh tokens are signed with independent secrets so a
/// refresh token can never be presented where an access token is expected.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// HMAC secret for access tokens.
    pub access_key: String,
    /// HMAC secret for refresh tokens.
    pub refresh_key: String,
    /// Access token lifetime in seconds.
    pub access_ttl_seconds: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_ttl_seconds: i64,
    /// Allowable clock skew in seconds when validating exp.
    pub leeway_seconds: u32,
}

pub const DEFAULT_ACCESS_TTL_SECONDS: i64 = 600;
pub const DEFAULT_REFRESH_TTL_SECONDS: i64 = 86_400;

impl TokenConfig {
    /// Construct config with default lifetimes (10 minutes / 24 hours) and
    /// no clock leeway, so a token is valid exactly within [iat, exp).
    pub fn new(access_key: impl Into<String>, refresh_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            refresh_key: refresh_key.into(),
            access_ttl_seconds: DEFAULT_ACCESS_TTL_SECONDS,
            refresh_ttl_seconds: DEFAULT_REFRESH_TTL_SECONDS,
            leeway_seconds: 0,
        }
    }

    pub fn with_ttls(mut self, access_ttl_seconds: i64, refresh_ttl_seconds: i64) -> Self {
        self.access_ttl_seconds = access_ttl_seconds;
        self.refresh_ttl_seconds = refresh_ttl_seconds;
        self
    }

    /// Adjust the allowed leeway.
    pub fn with_leeway(mut self, seconds: u32) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    pub fn key(&self, kind: TokenKind) -> &[u8] {
        match kind {
            TokenKind::Access => self.access_key.as_bytes(),
            TokenKind::Refresh => self.refresh_key.as_bytes(),
        }
    }

    pub fn ttl_seconds(&self, kind: TokenKind) -> i64 {
        match kind {
            TokenKind::Access => self.access_ttl_seconds,
            TokenKind::Refresh => self.refresh_ttl_seconds,
        }
    }
}
