//! Normalized request/response contract with the transport layer
//!
//! The deployment transport (originally an API-gateway proxy integration)
//! hands the handler an [`ApiRequest`] and receives an [`ApiResponse`]. Both
//! are plain serde types so a thin transport shim can move them as JSON.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A normalized update request as supplied by the transport layer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiRequest {
    /// Raw Authorization header value, if one was sent
    pub authorization: Option<String>,

    /// Query parameters of the update request
    pub query: QueryParams,

    /// Request-originating IP as seen by the transport
    pub source_ip: Option<String>,

    /// Per-deployment-stage flags
    pub stage: StageConfig,
}

/// Query parameters recognized by the endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    /// Comma-separated hostname list
    pub hostname: Option<String>,

    /// Candidate IPv4 literal
    pub myip: Option<String>,
}

/// Per-stage configuration flags carried on the request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Raise per-request log verbosity
    pub debug: bool,

    /// Stage override for the username secret name
    pub username_param: Option<String>,

    /// Stage override for the password secret name
    pub password_param: Option<String>,
}

/// An HTTP-style response handed back to the transport layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,

    /// Response headers
    pub headers: HashMap<String, String>,

    /// Response body
    pub body: String,

    /// Whether `body` is binary (base64) encoded; always false here, kept for
    /// transport-contract compatibility
    pub is_base64_encoded: bool,
}

impl ApiResponse {
    /// Build a plain-text response
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "text/plain".to_string());
        Self {
            status,
            headers,
            body: body.into(),
            is_base64_encoded: false,
        }
    }

    /// Attach a header, returning the response for chaining
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}
