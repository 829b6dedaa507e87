//! Configuration types for the DynDNS endpoint

use serde::{Deserialize, Serialize};

/// Endpoint configuration
///
/// Deployment stages may override the secret parameter names per request; the
/// values here are the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynDnsConfig {
    /// TTL applied when an upserted record has no existing TTL to preserve
    #[serde(default = "default_ttl")]
    pub default_ttl: u32,

    /// Logical secret name holding the update username
    #[serde(default = "default_username_param")]
    pub username_param: String,

    /// Logical secret name holding the update password
    #[serde(default = "default_password_param")]
    pub password_param: String,
}

impl DynDnsConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.default_ttl == 0 {
            return Err(crate::Error::config("default_ttl must be > 0"));
        }
        if self.username_param.is_empty() {
            return Err(crate::Error::config("username_param cannot be empty"));
        }
        if self.password_param.is_empty() {
            return Err(crate::Error::config("password_param cannot be empty"));
        }
        Ok(())
    }
}

impl Default for DynDnsConfig {
    fn default() -> Self {
        Self {
            default_ttl: default_ttl(),
            username_param: default_username_param(),
            password_param: default_password_param(),
        }
    }
}

fn default_ttl() -> u32 {
    300
}

fn default_username_param() -> String {
    "dyndns-username".to_string()
}

fn default_password_param() -> String {
    "dyndns-password".to_string()
}
