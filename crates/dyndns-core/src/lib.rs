// # dyndns-core
//
// Core library for the DynDNS update endpoint.
//
// ## Architecture Overview
//
// Given an authenticated request carrying hostnames and a candidate IP, the
// core decides per hostname whether the managed zone's address record needs
// to change, and if so updates it:
//
// - **DnsBackend**: trait over the zone-listing and record backend API
// - **SecretStore**: trait for credential retrieval
// - **ZoneDirectory**: session-scoped, paginated-to-exhaustion zone cache
//   with suffix-based hostname resolution
// - **UpdateEngine**: per-hostname GOOD/NOCHG/NOHOST/DNSERROR decision logic
//   and idempotent record upsert
// - **protocol**: request parameter parsing and the line-per-hostname
//   response encoding
// - **Authorizer**: Basic-auth credential check
// - **RequestHandler**: end-to-end request processing over injected
//   collaborators
//
// ## Design Principles
//
// 1. **Explicit injection**: collaborators enter through constructors, never
//    through global bindings
// 2. **Batch isolation**: one hostname's failure never aborts its siblings
// 3. **Session-scoped caching**: the zone directory is the only shared state,
//    frozen before the first update and dropped with the session
// 4. **Structured responses always**: every fault path ends in a response

pub mod auth;
pub mod config;
pub mod engine;
pub mod error;
pub mod handler;
pub mod hostname;
pub mod model;
pub mod protocol;
pub mod request;
pub mod secrets;
pub mod traits;
pub mod zones;

// Re-export core types for convenience
pub use auth::{AuthError, Authorizer};
pub use config::DynDnsConfig;
pub use engine::UpdateEngine;
pub use error::{Error, Result};
pub use handler::RequestHandler;
pub use model::{RecordChange, RecordKind, ResourceRecord, Zone, ZonePage};
pub use protocol::{RequestError, UpdateOutcome, UpdateParams};
pub use request::{ApiRequest, ApiResponse, QueryParams, StageConfig};
pub use secrets::{EnvSecretStore, MemorySecretStore};
pub use traits::{DnsBackend, SecretStore};
pub use zones::ZoneDirectory;
