// # Memory Secret Store
//
// In-memory implementation of SecretStore, primarily for tests and embedded
// usage where credentials are already in hand.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::Result;
use crate::traits::SecretStore;

/// Secret store backed by an in-memory map
#[derive(Debug, Clone, Default)]
pub struct MemorySecretStore {
    secrets: HashMap<String, String>,
}

impl MemorySecretStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a secret, returning the store for chaining
    pub fn with_secret(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(name.into(), value.into());
        self
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get_secrets(&self, names: &[&str]) -> Result<HashMap<String, String>> {
        Ok(names
            .iter()
            .filter_map(|name| {
                self.secrets
                    .get(*name)
                    .map(|value| ((*name).to_string(), value.clone()))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_only_known_names() {
        let store = MemorySecretStore::new()
            .with_secret("dyndns-username", "dnsuser")
            .with_secret("dyndns-password", "hunter2");

        let secrets = store
            .get_secrets(&["dyndns-username", "missing"])
            .await
            .unwrap();

        assert_eq!(secrets.get("dyndns-username").map(String::as_str), Some("dnsuser"));
        assert!(!secrets.contains_key("missing"));
    }
}
