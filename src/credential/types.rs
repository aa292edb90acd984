//! Credential types

use crate::error::Result;
use async_trait::async_trait;
use std::fmt;

/// Name of the cookie holding the bearer token
pub const TOKEN_COOKIE: &str = "token";

/// An opaque bearer token
///
/// The value is redacted from `Debug` output so it never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw token value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw token value. Avoid logging it.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the token is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&"[REDACTED]").finish()
    }
}

/// Read-only source of named credentials
///
/// `Ok(None)` means nothing is stored under `name`; `Err` means the store
/// itself could not be read.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up the current value stored under `name`
    async fn lookup(&self, name: &str) -> Result<Option<Credential>>;
}
