//! Request interceptors
//!
//! Interceptors run in registration order before every request is handed to
//! the transport. An interceptor returning `Err` aborts the request.

use super::types::OutgoingRequest;
use crate::credential::{CredentialStore, TOKEN_COOKIE};
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use std::sync::Arc;
use tracing::{debug, warn};

/// Hook applied to each outgoing request
#[async_trait]
pub trait RequestInterceptor: Send + Sync {
    /// Inspect or modify the request before it is sent
    async fn intercept(&self, request: OutgoingRequest) -> Result<OutgoingRequest>;
}

/// Attaches `Authorization: Bearer <token>` from a credential store
///
/// The store is read on every request, so a rotated token applies to the very
/// next call. A missing or blank token leaves the request unauthenticated; a
/// failed lookup aborts it.
#[derive(Clone)]
pub struct BearerTokenInterceptor {
    store: Arc<dyn CredentialStore>,
    name: String,
}

impl BearerTokenInterceptor {
    /// Read the `token` credential from `store`
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self::with_name(store, TOKEN_COOKIE)
    }

    /// Read a differently named credential
    pub fn with_name(store: Arc<dyn CredentialStore>, name: impl Into<String>) -> Self {
        Self {
            store,
            name: name.into(),
        }
    }
}

impl std::fmt::Debug for BearerTokenInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerTokenInterceptor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RequestInterceptor for BearerTokenInterceptor {
    async fn intercept(&self, mut request: OutgoingRequest) -> Result<OutgoingRequest> {
        let credential = match self.store.lookup(&self.name).await {
            Ok(credential) => credential,
            Err(e) => {
                warn!(
                    credential = %self.name,
                    url = %request.url,
                    error = %e,
                    "Credential lookup failed, request not sent"
                );
                if e.is_credential_lookup() {
                    return Err(e);
                }
                return Err(Error::credential_lookup(&self.name, e));
            }
        };

        match credential {
            Some(credential) if !credential.is_blank() => {
                let mut value = HeaderValue::from_str(&format!("Bearer {}", credential.expose()))
                    .map_err(|e| Error::invalid_header(AUTHORIZATION.as_str(), e))?;
                value.set_sensitive(true);
                request.headers.insert(AUTHORIZATION, value);
                debug!(url = %request.url, "Attached bearer token");
            }
            _ => debug!(url = %request.url, "No bearer token, sending unauthenticated"),
        }

        Ok(request)
    }
}
