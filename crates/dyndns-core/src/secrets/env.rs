// # Environment Secret Store
//
// Reads secrets from process environment variables. The logical secret name
// is mapped to an environment variable name by upper-casing and replacing
// `-` with `_` (`dyndns-username` -> `DYNDNS_USERNAME`).
//
// ## When to Use
//
// - Container/daemon deployments where secrets are injected via environment
// - Local development
//
// A managed parameter store would implement `SecretStore` the same way and
// plug in at the daemon boundary.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::Result;
use crate::traits::SecretStore;

/// Secret store backed by process environment variables
#[derive(Debug, Clone, Default)]
pub struct EnvSecretStore;

impl EnvSecretStore {
    /// Create a new environment-backed secret store
    pub fn new() -> Self {
        Self
    }

    fn env_name(secret_name: &str) -> String {
        secret_name.to_uppercase().replace('-', "_")
    }
}

#[async_trait]
impl SecretStore for EnvSecretStore {
    async fn get_secrets(&self, names: &[&str]) -> Result<HashMap<String, String>> {
        let mut secrets = HashMap::new();
        for name in names {
            if let Ok(value) = std::env::var(Self::env_name(name)) {
                secrets.insert((*name).to_string(), value);
            }
        }
        Ok(secrets)
    }
}
