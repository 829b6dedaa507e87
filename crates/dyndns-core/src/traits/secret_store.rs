// # Secret Store Trait
//
// Defines the interface for retrieving named secrets (the update credentials).
//
// ## Implementations
//
// - Environment variables: [`crate::secrets::EnvSecretStore`]
// - In-memory map: [`crate::secrets::MemorySecretStore`] (tests)

use async_trait::async_trait;
use std::collections::HashMap;

use crate::Result;

/// Interface for retrieving named secrets
///
/// Returns a mapping from logical secret name to secret value. A retrieval
/// failure surfaces as [`crate::Error::SecretStore`] and aborts the request
/// before any backend call.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch the named secrets
    ///
    /// Names absent from the store are absent from the returned map; callers
    /// decide whether that is an error.
    async fn get_secrets(&self, names: &[&str]) -> Result<HashMap<String, String>>;
}
