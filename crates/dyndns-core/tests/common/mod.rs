//! Test doubles and common utilities for contract tests

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use dyndns_core::error::{Error, Result};
use dyndns_core::model::{RecordChange, RecordKind, ResourceRecord, Zone, ZonePage};
use dyndns_core::traits::DnsBackend;
use dyndns_core::{ApiRequest, DynDnsConfig, MemorySecretStore, QueryParams};

/// A scripted DnsBackend that serves zones in pages, tracks calls, and
/// applies accepted changes to its record set
///
/// All interior state is shared, so a clone observes the same counters and
/// records as the handle given to the engine.
#[derive(Clone, Default)]
pub struct MockDnsBackend {
    zones: Arc<Mutex<Vec<Zone>>>,
    page_size: Arc<AtomicUsize>,
    fail_on_page: Arc<Mutex<Option<usize>>>,
    records: Arc<Mutex<HashMap<(String, String), ResourceRecord>>>,
    fail_submit: Arc<Mutex<bool>>,
    fail_lookup: Arc<Mutex<bool>>,
    list_zones_calls: Arc<AtomicUsize>,
    list_records_calls: Arc<AtomicUsize>,
    submit_calls: Arc<AtomicUsize>,
    submitted: Arc<Mutex<Vec<(String, RecordChange)>>>,
}

impl MockDnsBackend {
    pub fn new() -> Self {
        let backend = Self::default();
        backend.page_size.store(usize::MAX, Ordering::SeqCst);
        backend
    }

    /// Add a zone to the directory listing
    pub fn with_zone(self, id: &str, name: &str) -> Self {
        self.zones.lock().unwrap().push(Zone::new(id, name));
        self
    }

    /// Add an address record to a zone
    pub fn with_record(self, zone_id: &str, name: &str, value: &str, ttl: u32) -> Self {
        let record = ResourceRecord {
            zone_id: zone_id.to_string(),
            name: name.to_string(),
            kind: RecordKind::A,
            value: value.to_string(),
            ttl,
        };
        self.records
            .lock()
            .unwrap()
            .insert((zone_id.to_string(), name.to_string()), record);
        self
    }

    /// Serve the zone listing in pages of `size`
    pub fn with_page_size(self, size: usize) -> Self {
        self.page_size.store(size, Ordering::SeqCst);
        self
    }

    /// Fail the listing when asked for the given (zero-based) page
    pub fn failing_on_page(self, page: usize) -> Self {
        *self.fail_on_page.lock().unwrap() = Some(page);
        self
    }

    /// Reject every submitted change
    pub fn failing_submits(self) -> Self {
        *self.fail_submit.lock().unwrap() = true;
        self
    }

    /// Fail every record lookup
    pub fn failing_lookups(self) -> Self {
        *self.fail_lookup.lock().unwrap() = true;
        self
    }

    pub fn list_zones_calls(&self) -> usize {
        self.list_zones_calls.load(Ordering::SeqCst)
    }

    pub fn list_records_calls(&self) -> usize {
        self.list_records_calls.load(Ordering::SeqCst)
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    /// Changes the backend accepted, in submission order
    pub fn submitted(&self) -> Vec<(String, RecordChange)> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl DnsBackend for MockDnsBackend {
    async fn list_zones(&self, marker: Option<&str>) -> Result<ZonePage> {
        self.list_zones_calls.fetch_add(1, Ordering::SeqCst);

        let page: usize = match marker {
            None => 0,
            Some(m) => m
                .parse()
                .map_err(|_| Error::backend(format!("bad marker: {}", m)))?,
        };

        if *self.fail_on_page.lock().unwrap() == Some(page) {
            return Err(Error::backend("zone listing unavailable"));
        }

        let zones = self.zones.lock().unwrap();
        let page_size = self.page_size.load(Ordering::SeqCst);
        let start = page.saturating_mul(page_size);
        let chunk: Vec<Zone> = zones.iter().skip(start).take(page_size).cloned().collect();
        let truncated = start + chunk.len() < zones.len();

        Ok(ZonePage {
            zones: chunk,
            next_marker: truncated.then(|| (page + 1).to_string()),
            truncated,
        })
    }

    async fn list_records(
        &self,
        zone_id: &str,
        name: &str,
        kind: RecordKind,
        max: usize,
    ) -> Result<Vec<ResourceRecord>> {
        self.list_records_calls.fetch_add(1, Ordering::SeqCst);

        if *self.fail_lookup.lock().unwrap() {
            return Err(Error::backend("record listing unavailable"));
        }

        // Like a real paginated listing: results start at the requested name
        // and continue lexically, so an absent name yields its successor.
        let records = self.records.lock().unwrap();
        let mut matching: Vec<ResourceRecord> = records
            .values()
            .filter(|r| r.zone_id == zone_id && r.kind == kind && r.name.as_str() >= name)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name));
        matching.truncate(max);
        Ok(matching)
    }

    async fn submit_change(&self, zone_id: &str, change: &RecordChange) -> Result<()> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);

        if *self.fail_submit.lock().unwrap() {
            return Err(Error::dns("change batch refused"));
        }

        self.records.lock().unwrap().insert(
            (zone_id.to_string(), change.name.clone()),
            ResourceRecord {
                zone_id: zone_id.to_string(),
                name: change.name.clone(),
                kind: change.kind,
                value: change.value.clone(),
                ttl: change.ttl,
            },
        );
        self.submitted
            .lock()
            .unwrap()
            .push((zone_id.to_string(), change.clone()));
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}

/// Test credentials shared by the handler contract tests
pub const TEST_USERNAME: &str = "dnsuser";
pub const TEST_PASSWORD: &str = "hunter2";

/// Secret store holding the test credentials under the default parameter names
pub fn test_secret_store() -> MemorySecretStore {
    MemorySecretStore::new()
        .with_secret("dyndns-username", TEST_USERNAME)
        .with_secret("dyndns-password", TEST_PASSWORD)
}

/// Default endpoint configuration for tests
pub fn test_config() -> DynDnsConfig {
    DynDnsConfig::default()
}

/// A Basic Authorization header value for the given credentials
pub fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{}:{}", username, password)))
}

/// An authorized ApiRequest carrying the given hostname/myip parameters
pub fn authed_request(hostname: Option<&str>, myip: Option<&str>) -> ApiRequest {
    ApiRequest {
        authorization: Some(basic_auth(TEST_USERNAME, TEST_PASSWORD)),
        query: QueryParams {
            hostname: hostname.map(str::to_string),
            myip: myip.map(str::to_string),
        },
        ..Default::default()
    }
}
