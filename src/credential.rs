//! Token credentials used to authorize ARM requests.
//!
//! Acquiring tokens (OAuth flows, managed identity, developer tooling) is
//! out of scope for this crate; callers hand in a token or implement
//! [`TokenCredential`] on top of their identity library of choice.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::error::{ArmError, Result};

/// Scope requested for Azure Resource Manager tokens.
pub const ARM_SCOPE: &str = "https://management.azure.com/.default";

/// A bearer token with its expiry.
#[derive(Clone)]
pub struct AccessToken {
    /// The token value.
    pub token: String,
    /// When the token stops being valid.
    pub expires_on: DateTime<Utc>,
}

impl AccessToken {
    /// Create a token that expires at the given instant.
    pub fn new(token: impl Into<String>, expires_on: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_on,
        }
    }

    /// Whether the token has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_on <= now
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("expires_on", &self.expires_on)
            .finish_non_exhaustive()
    }
}

/// Source of bearer tokens for the request pipeline.
#[async_trait]
pub trait TokenCredential: Send + Sync {
    /// Get a token valid for the given scopes.
    ///
    /// # Errors
    ///
    /// Returns [`ArmError::Credential`] if no token can be produced.
    async fn get_token(&self, scopes: &[&str]) -> Result<AccessToken>;
}

/// A credential wrapping a pre-acquired token.
///
/// Useful when the token comes from the environment (`AZURE_ACCESS_TOKEN`)
/// or an external tool such as `az account get-access-token`.
#[derive(Clone)]
pub struct StaticTokenCredential {
    token: AccessToken,
}

impl StaticTokenCredential {
    /// Wrap a raw token. Its expiry is unknown, so it's treated as valid for an hour.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: AccessToken::new(token, Utc::now() + Duration::hours(1)),
        }
    }

    /// Wrap a token with a known expiry.
    pub fn with_expiry(token: impl Into<String>, expires_on: DateTime<Utc>) -> Self {
        Self {
            token: AccessToken::new(token, expires_on),
        }
    }
}

impl fmt::Debug for StaticTokenCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenCredential")
            .field("token", &self.token)
            .finish()
    }
}

#[async_trait]
impl TokenCredential for StaticTokenCredential {
    async fn get_token(&self, _scopes: &[&str]) -> Result<AccessToken> {
        if self.token.is_expired_at(Utc::now()) {
            return Err(ArmError::Credential("static token has expired".to_string()));
        }
        Ok(self.token.clone())
    }
}

/// A credential that always returns a placeholder token.
///
/// Pair it with a fake server so tests never need real Azure credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeCredential;

#[async_trait]
impl TokenCredential for FakeCredential {
    async fn get_token(&self, _scopes: &[&str]) -> Result<AccessToken> {
        Ok(AccessToken::new(
            "fake-token",
            Utc::now() + Duration::days(1),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_credential_returns_token() {
        let cred = StaticTokenCredential::new("abc");
        let token = cred.get_token(&[ARM_SCOPE]).await.unwrap();
        assert_eq!(token.token, "abc");
    }

    #[tokio::test]
    async fn test_static_credential_rejects_expired_token() {
        let cred = StaticTokenCredential::with_expiry("abc", Utc::now() - Duration::minutes(5));
        let err = cred.get_token(&[ARM_SCOPE]).await.unwrap_err();
        assert!(matches!(err, ArmError::Credential(_)));
    }

    #[test]
    fn test_token_debug_hides_secret() {
        let cred = StaticTokenCredential::new("super-secret");
        let debug = format!("{:?}", cred);
        assert!(!debug.contains("super-secret"));
    }
}
