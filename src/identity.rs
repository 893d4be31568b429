//! External identity provider seam.
//!
//! The OAuth handshake itself is delegated; the portal only needs a
//! redirect URL and a code-for-claims exchange. Provider failures are
//! surfaced as the single opaque [`AuthError::AuthFailed`].

use async_trait::async_trait;

use crate::AuthError;

/// Claims returned by a successful identity exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaims {
    pub email: String,
    pub name: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// URL the client is redirected to for the provider's login flow.
    fn authorize_url(&self) -> String;

    /// Exchanges the callback code for identity claims.
    async fn exchange_code(&self, code: &str) -> Result<IdentityClaims, AuthError>;
}

/// Test/demo provider that accepts a single expected code.
#[derive(Clone)]
pub struct MockIdentityProvider {
    claims: IdentityClaims,
    expected_code: String,
}

impl MockIdentityProvider {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            claims: IdentityClaims {
                email: email.into(),
                name: name.into(),
            },
            expected_code: "mock-code".to_owned(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.expected_code = code.into();
        self
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    fn authorize_url(&self) -> String {
        "https://accounts.example.com/o/oauth2/auth?client_id=mock".to_owned()
    }

    async fn exchange_code(&self, code: &str) -> Result<IdentityClaims, AuthError> {
        if code == self.expected_code {
            Ok(self.claims.clone())
        } else {
            Err(AuthError::AuthFailed)
        }
    }
}
