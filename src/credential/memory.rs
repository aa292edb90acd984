//! In-memory credential store

use super::types::{Credential, CredentialStore};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared in-memory credential map
///
/// Clones share the same map, so a value set through one handle is seen by
/// every client holding another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding a single value
    pub fn with(name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut values = HashMap::new();
        values.insert(name.into(), value.into());
        Self {
            values: Arc::new(RwLock::new(values)),
        }
    }

    /// Store or replace a value
    pub async fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        self.values.write().await.insert(name.into(), value.into());
    }

    /// Remove a value, returning whether one was present
    pub async fn remove(&self, name: &str) -> bool {
        self.values.write().await.remove(name).is_some()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn lookup(&self, name: &str) -> Result<Option<Credential>> {
        Ok(self.values.read().await.get(name).map(Credential::new))
    }
}
