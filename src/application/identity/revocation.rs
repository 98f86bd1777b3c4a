//! Signed-out token ids
//!
//! Tokens stay cryptographically valid until they expire, so sign-out
//! records the token id here until then. The auth middleware consults it
//! on every request.

use chrono::Utc;
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct TokenRevocations {
    /// jti -> expiry (unix seconds)
    revoked: DashMap<String, i64>,
}

impl TokenRevocations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revoke(&self, jti: &str, expires_at: i64) {
        let now = Utc::now().timestamp();
        self.revoked.retain(|_, exp| *exp >= now);
        self.revoked.insert(jti.to_string(), expires_at);
    }

    pub fn is_revoked(&self, jti: &str) -> bool {
        self.revoked.contains_key(jti)
    }

    pub fn len(&self) -> usize {
        self.revoked.len()
    }
}
