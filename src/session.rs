use chrono::{DateTime, Duration, Utc};
use std::fmt;

use crate::models::auth::{TokenResponse, User};

/// Bearer token attached to outgoing requests.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Signed-in state owned by the caller.
///
/// Nothing is persisted; dropping the session is logging out.
#[derive(Debug, Clone)]
pub struct Session {
    access: Credential,
    refresh_token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
    pub user: Option<User>,
}

impl Session {
    pub fn from_tokens(tokens: TokenResponse) -> Self {
        Self::from_tokens_at(tokens, Utc::now())
    }

    pub fn from_tokens_at(tokens: TokenResponse, issued_at: DateTime<Utc>) -> Self {
        Self {
            access: Credential::new(tokens.access_token),
            refresh_token: tokens.refresh_token,
            expires_at: tokens
                .expires_in
                .map(|secs| issued_at + Duration::seconds(secs as i64)),
            user: tokens.user,
        }
    }

    pub fn credential(&self) -> &Credential {
        &self.access
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// A session without a known expiry never reports itself expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }

    /// Swap in tokens from `POST /auth/refresh`, keeping the known user.
    pub fn apply_refresh(&mut self, tokens: TokenResponse, issued_at: DateTime<Utc>) {
        let user = tokens.user.clone().or_else(|| self.user.take());
        let refresh_token = tokens.refresh_token.clone().or_else(|| self.refresh_token.take());
        *self = Self::from_tokens_at(tokens, issued_at);
        self.user = user;
        self.refresh_token = refresh_token;
    }
}
