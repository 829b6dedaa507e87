// # DNS Backend Trait
//
// Defines the interface to the authoritative DNS-record backend: a paginated
// zone listing, a scoped record listing, and a change-batch submission.
//
// ## Implementations
//
// - Cloudflare: `dyndns-backend-cloudflare` crate
// - Test doubles: `tests/common/mod.rs`

use async_trait::async_trait;

use crate::Result;
use crate::model::{RecordChange, RecordKind, ResourceRecord, ZonePage};

/// Interface to the authoritative DNS-record backend
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Error Mapping
///
/// Transport and backend-auth failures surface as [`crate::Error::Backend`];
/// rejected record changes as [`crate::Error::Dns`]. Implementations do not
/// retry: a failure is reported once and the caller decides what it means for
/// the hostname being processed.
#[async_trait]
pub trait DnsBackend: Send + Sync {
    /// List one page of authoritative zones
    ///
    /// `marker` is the continuation marker returned by the previous page, or
    /// `None` for the first page. The returned [`ZonePage`] carries the next
    /// marker and whether more pages remain.
    async fn list_zones(&self, marker: Option<&str>) -> Result<ZonePage>;

    /// List records of `kind` starting at `name` within a zone, at most `max`
    ///
    /// Backends may return the lexically-next record when no record with the
    /// exact name exists; callers must verify the name of what comes back.
    async fn list_records(
        &self,
        zone_id: &str,
        name: &str,
        kind: RecordKind,
        max: usize,
    ) -> Result<Vec<ResourceRecord>>;

    /// Submit a change batch containing exactly one record upsert
    ///
    /// Success means the backend accepted the change request; propagation is
    /// not awaited or verified.
    async fn submit_change(&self, zone_id: &str, change: &RecordChange) -> Result<()>;

    /// Get the backend name (for logging/debugging)
    fn backend_name(&self) -> &'static str;
}
