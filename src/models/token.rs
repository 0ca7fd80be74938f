use serde::{Deserialize, Serialize};

/// Leeway subtracted from `expires_at` when judging token freshness.
const EXPIRY_LEEWAY_MS: i64 = 60_000;

/// Access token issued by the OAuth server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    /// Expiry as unix milliseconds. Zero means "unknown": the token is
    /// trusted until the server rejects it (pre-issued tokens).
    pub expires_at: i64,
}

/// Response of the legacy `POST /token` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Token {
    pub tok: String,
    pub exp: i64,
}

impl AccessToken {
    pub(crate) fn is_fresh(&self, now_ms: i64) -> bool {
        self.expires_at == 0 || self.expires_at - EXPIRY_LEEWAY_MS > now_ms
    }
}

impl From<Token> for AccessToken {
    fn from(token: Token) -> Self {
        Self {
            access_token: token.tok,
            expires_at: token.exp,
        }
    }
}
