//! Single-use, time-limited access tokens.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::crypto::generate_token;
use crate::AuthError;

/// A single-use, time-boxed permission.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Ledger of outstanding one-time tokens.
///
/// A token is consumed by at most one successful redemption, ever: `redeem`
/// removes the entry in every outcome (valid, expired, unknown) before
/// answering.
#[async_trait]
pub trait TokenLedger: Send + Sync {
    /// Issues a fresh unguessable token with the ledger's TTL.
    async fn issue(&self) -> Result<AccessToken, AuthError>;

    /// Returns `true` iff the token exists and has not expired. The entry
    /// is removed regardless, so a second redemption always yields `false`.
    async fn redeem(&self, token: &str) -> Result<bool, AuthError>;
}

/// In-memory ledger backed by a mutex-guarded map.
///
/// The remove-then-check sequence runs under a single lock acquisition, so
/// two concurrent redeemers of one token cannot both observe "valid".
#[derive(Clone)]
pub struct InMemoryTokenLedger {
    ttl: Duration,
    tokens: Arc<Mutex<HashMap<String, DateTime<Utc>>>>,
}

impl InMemoryTokenLedger {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            tokens: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryTokenLedger {
    /// 10-second TTL.
    fn default() -> Self {
        Self::new(Duration::seconds(10))
    }
}

#[async_trait]
impl TokenLedger for InMemoryTokenLedger {
    async fn issue(&self) -> Result<AccessToken, AuthError> {
        let token = generate_token(32);
        let expires_at = Utc::now() + self.ttl;

        self.tokens
            .lock()
            .map_err(|_| AuthError::StoreError("ledger lock poisoned".to_owned()))?
            .insert(token.clone(), expires_at);

        log::debug!(target: "medgate::ledger", "msg=\"token issued\" expires_at=\"{}\"", expires_at);
        Ok(AccessToken { token, expires_at })
    }

    async fn redeem(&self, token: &str) -> Result<bool, AuthError> {
        let entry = self
            .tokens
            .lock()
            .map_err(|_| AuthError::StoreError("ledger lock poisoned".to_owned()))?
            .remove(token);

        let valid = matches!(entry, Some(expires_at) if Utc::now() <= expires_at);
        log::debug!(target: "medgate::ledger", "msg=\"token redeemed\" valid={}", valid);
        Ok(valid)
    }
}
