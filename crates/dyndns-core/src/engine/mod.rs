//! Update reconciliation engine
//!
//! One engine is constructed per request session: construction loads and
//! freezes the zone directory, then each hostname in the batch runs through
//! [`UpdateEngine::update`] independently. The per-hostname flow:
//!
//! ```text
//! normalize ── find zone ──── none ──────────────► NoHost
//!                 │
//!          lookup A record ── absent ───────────► NoHost
//!                 │           lookup failed ────► DnsError
//!          compare value ──── equal ────────────► NoChg
//!                 │
//!          upsert record ──── accepted ─────────► Good
//!                             refused/failed ───► DnsError
//! ```
//!
//! Backend failures inside `update` are logged and folded into the outcome;
//! they never propagate to the caller, so one hostname's failure cannot
//! abort its siblings.

use std::sync::Arc;
use tracing::{debug, error, info};

use crate::Result;
use crate::config::DynDnsConfig;
use crate::hostname;
use crate::model::{RecordChange, RecordKind, ResourceRecord, Zone};
use crate::protocol::UpdateOutcome;
use crate::traits::DnsBackend;
use crate::zones::ZoneDirectory;

/// Reconciles hostnames against the backend's address records
///
/// Holds the session's frozen zone directory. Stateless apart from that:
/// `update` may be called repeatedly and in any order for the hostnames of a
/// batch.
pub struct UpdateEngine {
    backend: Arc<dyn DnsBackend>,
    zones: ZoneDirectory,
    default_ttl: u32,
}

impl UpdateEngine {
    /// Start an engine session: load the full zone directory and freeze it
    ///
    /// Fails with the backend's error if any listing page fails; no session
    /// exists in that case, since no hostname can be resolved without the
    /// zone directory.
    pub async fn start(backend: Arc<dyn DnsBackend>, config: &DynDnsConfig) -> Result<Self> {
        let zones = ZoneDirectory::load(backend.as_ref()).await?;
        Ok(Self {
            backend,
            zones,
            default_ttl: config.default_ttl,
        })
    }

    /// The session's zone directory
    pub fn zones(&self) -> &ZoneDirectory {
        &self.zones
    }

    /// Reconcile one hostname towards `ip`
    ///
    /// `ip` is compared against the stored record value by exact string
    /// equality; a non-canonical stored value (`001.002.003.004`) is treated
    /// as different and rewritten.
    pub async fn update(&self, raw_hostname: &str, ip: &str) -> UpdateOutcome {
        let hostname = hostname::normalize(raw_hostname);

        let Some(zone) = self.zones.find_zone(&hostname) else {
            debug!(host = %hostname, "no zone owns hostname");
            return UpdateOutcome::NoHost;
        };

        let record = match self.current_record(&zone.id, &hostname).await {
            Ok(record) => record,
            Err(err) => {
                error!(host = %hostname, error = %err, "record lookup failed");
                return UpdateOutcome::DnsError;
            }
        };

        let Some(record) = record else {
            debug!(host = %hostname, zone = %zone.name, "no address record for hostname");
            return UpdateOutcome::NoHost;
        };

        if record.value == ip {
            debug!(host = %hostname, ip, "record already current");
            return UpdateOutcome::NoChg(record.value);
        }

        match self.upsert(zone, &hostname, ip, &record).await {
            Ok(()) => {
                info!(host = %hostname, from = %record.value, to = ip, "record updated");
                UpdateOutcome::Good(ip.to_string())
            }
            Err(err) => {
                error!(host = %hostname, error = %err, "record upsert failed");
                UpdateOutcome::DnsError
            }
        }
    }

    /// Fetch the current address record for a hostname, if one exists
    ///
    /// The backend listing starts at the requested name but may hand back the
    /// lexically-next record when the exact name is absent, so the first
    /// result is verified against the requested name and kind before use.
    async fn current_record(
        &self,
        zone_id: &str,
        hostname: &str,
    ) -> Result<Option<ResourceRecord>> {
        let records = self
            .backend
            .list_records(zone_id, hostname, RecordKind::A, 1)
            .await?;

        Ok(records
            .into_iter()
            .next()
            .filter(|record| record.name == hostname && record.kind == RecordKind::A))
    }

    /// Submit the single-change upsert batch for a record
    async fn upsert(
        &self,
        zone: &Zone,
        hostname: &str,
        new_ip: &str,
        previous: &ResourceRecord,
    ) -> Result<()> {
        let ttl = if previous.ttl > 0 {
            previous.ttl
        } else {
            self.default_ttl
        };

        let change = RecordChange {
            name: hostname.to_string(),
            kind: RecordKind::A,
            value: new_ip.to_string(),
            ttl,
            comment: format!(
                "Updating address from {} to {} at {}",
                previous.value,
                new_ip,
                chrono::Utc::now().to_rfc3339()
            ),
        };

        self.backend.submit_change(&zone.id, &change).await
    }
}
