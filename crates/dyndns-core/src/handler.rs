//! Request handler: the top of the core's control flow
//!
//! Wires authorization, parameter parsing, the engine session and the batch
//! encoder into one request/response function. Error taxonomy:
//!
//! - request errors → 400 with the error's one-line body
//! - missing credentials → 401 plus a Basic challenge; invalid → 403
//! - zone listing or secret retrieval failure → 500, body `911`
//! - per-hostname domain errors → embedded in the 200 body
//!
//! `handle` never fails: whatever goes wrong, the transport gets a
//! structured response.

use std::sync::Arc;
use tracing::{debug, error, info};

use crate::Result;
use crate::auth::{AuthError, Authorizer, REALM};
use crate::config::DynDnsConfig;
use crate::engine::UpdateEngine;
use crate::hostname;
use crate::protocol::{self, UpdateOutcome};
use crate::request::{ApiRequest, ApiResponse};
use crate::traits::{DnsBackend, SecretStore};

/// Response body for auth failures
const BADAUTH: &str = "badauth";

/// Handles normalized update requests end to end
///
/// Dependencies are injected at construction; the handler holds no mutable
/// state and may serve any number of requests.
pub struct RequestHandler {
    backend: Arc<dyn DnsBackend>,
    secrets: Arc<dyn SecretStore>,
    config: DynDnsConfig,
}

impl RequestHandler {
    /// Create a handler from its collaborators
    pub fn new(
        backend: Arc<dyn DnsBackend>,
        secrets: Arc<dyn SecretStore>,
        config: DynDnsConfig,
    ) -> Self {
        Self {
            backend,
            secrets,
            config,
        }
    }

    /// Process one update request
    pub async fn handle(&self, request: &ApiRequest) -> ApiResponse {
        match self.try_handle(request).await {
            Ok(response) => response,
            Err(err) => {
                error!(error = %err, "unhandled failure while processing update request");
                ApiResponse::text(500, UpdateOutcome::Panic.code())
            }
        }
    }

    async fn try_handle(&self, request: &ApiRequest) -> Result<ApiResponse> {
        if request.stage.debug {
            debug!(?request.query, source_ip = ?request.source_ip, "processing update request");
        }

        // Stage config may override which secrets hold the credentials.
        let username_param = request
            .stage
            .username_param
            .as_deref()
            .unwrap_or(&self.config.username_param);
        let password_param = request
            .stage
            .password_param
            .as_deref()
            .unwrap_or(&self.config.password_param);

        let authorizer =
            Authorizer::from_secrets(self.secrets.as_ref(), username_param, password_param).await?;

        match authorizer.authorize(request.authorization.as_deref()) {
            Ok(()) => {}
            Err(AuthError::MissingCredentials) => {
                return Ok(ApiResponse::text(401, BADAUTH)
                    .with_header("WWW-Authenticate", format!("Basic realm=\"{}\"", REALM)));
            }
            Err(AuthError::InvalidCredentials) => {
                return Ok(ApiResponse::text(403, BADAUTH));
            }
        }

        let params = match protocol::parse_params(
            request.query.hostname.as_deref(),
            request.query.myip.as_deref(),
            request.source_ip.as_deref(),
        ) {
            Ok(params) => params,
            Err(err) => return Ok(ApiResponse::text(400, err.to_string())),
        };

        // One session per request: the zone directory is loaded once here and
        // frozen before the first hostname is processed. If the listing fails
        // no hostname can be resolved, so the whole request fails.
        let engine = UpdateEngine::start(self.backend.clone(), &self.config).await?;

        let mut results = Vec::with_capacity(params.hostnames.len());
        for host in &params.hostnames {
            let outcome = if hostname::is_well_formed_fqdn(host) {
                engine.update(host, &params.myip).await
            } else {
                UpdateOutcome::NotFqdn
            };

            info!(host = %host, outcome = outcome.code(), "hostname processed");
            results.push((host.clone(), outcome));
        }

        Ok(ApiResponse::text(200, protocol::encode_batch(&results)))
    }
}
