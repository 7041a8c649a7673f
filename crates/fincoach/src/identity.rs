//! Identity verification seam.
//!
//! Token verification belongs to an external identity provider. The service only
//! depends on [`IdentityVerifier`]; the bundled [`StaticTokenVerifier`] maps opaque
//! bearer tokens to identities loaded from configuration, which is enough for local
//! development and tests.

use std::collections::HashMap;

use axum::http::{header, HeaderMap};

use crate::config::{ConfigError, IdentityConfig};

/// Identity asserted by the provider for a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub uid: String,
    pub email: String,
}

pub trait IdentityVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<VerifiedIdentity, IdentityError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("no bearer token provided")]
    MissingCredential,
    #[error("authorization header is not a bearer token")]
    MalformedHeader,
    #[error("invalid token")]
    InvalidToken,
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, IdentityError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(IdentityError::MissingCredential)?;
    let value = value.to_str().map_err(|_| IdentityError::MalformedHeader)?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or(IdentityError::MissingCredential)?
        .trim();

    if token.is_empty() {
        return Err(IdentityError::MissingCredential);
    }
    Ok(token)
}

#[derive(Debug, Clone, Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, VerifiedIdentity>,
}

impl StaticTokenVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(
        mut self,
        token: impl Into<String>,
        uid: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        self.tokens.insert(
            token.into(),
            VerifiedIdentity {
                uid: uid.into(),
                email: email.into(),
            },
        );
        self
    }

    /// Parse `token=uid:email` entries separated by `;`. Email may be empty.
    pub fn from_config(config: &IdentityConfig) -> Result<Self, ConfigError> {
        let mut verifier = Self::new();
        for entry in config
            .tokens
            .split(';')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
        {
            let invalid = || ConfigError::InvalidIdentityEntry(entry.to_string());
            let (token, identity) = entry.split_once('=').ok_or_else(invalid)?;
            let (uid, email) = identity.split_once(':').unwrap_or((identity, ""));
            let (token, uid) = (token.trim(), uid.trim());
            if token.is_empty() || uid.is_empty() {
                return Err(invalid());
            }
            verifier = verifier.with_token(token, uid, email.trim());
        }
        Ok(verifier)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl IdentityVerifier for StaticTokenVerifier {
    fn verify(&self, token: &str) -> Result<VerifiedIdentity, IdentityError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or(IdentityError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(value).expect("valid header"),
        );
        headers
    }

    #[test]
    fn bearer_token_requires_scheme() {
        assert_eq!(bearer_token(&headers("Bearer abc")), Ok("abc"));
        assert_eq!(
            bearer_token(&headers("Basic abc")),
            Err(IdentityError::MissingCredential)
        );
        assert_eq!(
            bearer_token(&HeaderMap::new()),
            Err(IdentityError::MissingCredential)
        );
        assert_eq!(
            bearer_token(&headers("Bearer   ")),
            Err(IdentityError::MissingCredential)
        );
    }

    #[test]
    fn parses_configured_tokens() {
        let config = IdentityConfig {
            tokens: "alpha=user-1:one@example.com; beta=user-2".to_string(),
        };
        let verifier = StaticTokenVerifier::from_config(&config).expect("entries parse");
        assert_eq!(verifier.len(), 2);

        let identity = verifier.verify("alpha").expect("alpha is known");
        assert_eq!(identity.uid, "user-1");
        assert_eq!(identity.email, "one@example.com");
        assert_eq!(verifier.verify("beta").expect("beta is known").email, "");
        assert_eq!(verifier.verify("gamma"), Err(IdentityError::InvalidToken));
    }

    #[test]
    fn rejects_entries_without_uid() {
        let config = IdentityConfig {
            tokens: "alpha".to_string(),
        };
        assert!(matches!(
            StaticTokenVerifier::from_config(&config),
            Err(ConfigError::InvalidIdentityEntry(entry)) if entry == "alpha"
        ));
    }
}
