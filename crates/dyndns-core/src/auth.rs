//! Basic-auth authorization for update requests
//!
//! The endpoint accepts one credential pair. A missing Authorization header
//! and present-but-invalid credentials are distinguished so the transport can
//! answer 401-with-challenge vs 403.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::info;

use crate::error::{Error, Result};
use crate::traits::SecretStore;

/// Authentication realm advertised in the 401 challenge
pub const REALM: &str = "DynDns API";

/// Why a request failed authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No Authorization header was supplied (answer 401 + challenge)
    MissingCredentials,
    /// A header was supplied but did not carry the expected credentials
    /// (answer 403, no challenge)
    InvalidCredentials,
}

/// Validates Basic credentials on incoming requests
#[derive(Clone)]
pub struct Authorizer {
    username: String,
    password: String,
}

// Credentials never appear in Debug output.
impl std::fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authorizer")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

impl Authorizer {
    /// Create an authorizer from explicit credentials
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Create an authorizer by fetching both credentials from a secret store
    ///
    /// `username_param` and `password_param` are the logical secret names
    /// configured for the deployment stage. A secret missing from the store
    /// is a configuration fault, not an auth failure.
    pub async fn from_secrets(
        store: &dyn SecretStore,
        username_param: &str,
        password_param: &str,
    ) -> Result<Self> {
        let mut secrets = store.get_secrets(&[username_param, password_param]).await?;

        let username = secrets
            .remove(username_param)
            .ok_or_else(|| Error::secret_store(format!("secret not found: {}", username_param)))?;
        let password = secrets
            .remove(password_param)
            .ok_or_else(|| Error::secret_store(format!("secret not found: {}", password_param)))?;

        Ok(Self { username, password })
    }

    /// Check an Authorization header value against the configured credentials
    pub fn authorize(&self, header: Option<&str>) -> std::result::Result<(), AuthError> {
        let Some(header) = header else {
            info!("authorize: no Authorization header supplied");
            return Err(AuthError::MissingCredentials);
        };

        // Header shape is "Basic <base64(username:password)>".
        let Some((username, password)) = decode_basic(header) else {
            info!("authorize: malformed Authorization header");
            return Err(AuthError::InvalidCredentials);
        };

        if username != self.username {
            info!("authorize: invalid username");
            return Err(AuthError::InvalidCredentials);
        }

        if password != self.password {
            info!("authorize: invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(())
    }
}

/// Decode a Basic Authorization header into (username, password)
fn decode_basic(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?.trim();
    let decoded = BASE64.decode(encoded).ok()?;
    let plain = String::from_utf8(decoded).ok()?;
    let (username, password) = plain.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic_header(username: &str, password: &str) -> String {
        format!("Basic {}", BASE64.encode(format!("{}:{}", username, password)))
    }

    #[test]
    fn accepts_matching_credentials() {
        let authorizer = Authorizer::new("dnsuser", "hunter2");
        let header = basic_header("dnsuser", "hunter2");
        assert_eq!(authorizer.authorize(Some(&header)), Ok(()));
    }

    #[test]
    fn missing_header_is_distinguished_from_bad_credentials() {
        let authorizer = Authorizer::new("dnsuser", "hunter2");
        assert_eq!(
            authorizer.authorize(None),
            Err(AuthError::MissingCredentials)
        );

        let header = basic_header("dnsuser", "wrong");
        assert_eq!(
            authorizer.authorize(Some(&header)),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn wrong_username_is_rejected() {
        let authorizer = Authorizer::new("dnsuser", "hunter2");
        let header = basic_header("intruder", "hunter2");
        assert_eq!(
            authorizer.authorize(Some(&header)),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn garbage_header_is_rejected() {
        let authorizer = Authorizer::new("dnsuser", "hunter2");
        assert_eq!(
            authorizer.authorize(Some("Basic not-base64!!")),
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            authorizer.authorize(Some("Bearer abcdef")),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn password_containing_colon_survives_decoding() {
        let authorizer = Authorizer::new("dnsuser", "pa:ss");
        let header = basic_header("dnsuser", "pa:ss");
        assert_eq!(authorizer.authorize(Some(&header)), Ok(()));
    }

    #[test]
    fn password_not_exposed_in_debug() {
        let authorizer = Authorizer::new("dnsuser", "hunter2");
        let debug = format!("{:?}", authorizer);
        assert!(!debug.contains("hunter2"));
    }

    #[tokio::test]
    async fn from_secrets_requires_both_parameters() {
        use crate::secrets::MemorySecretStore;

        let store = MemorySecretStore::new().with_secret("dyndns-username", "dnsuser");
        let result = Authorizer::from_secrets(&store, "dyndns-username", "dyndns-password").await;
        assert!(result.is_err());
    }
}
