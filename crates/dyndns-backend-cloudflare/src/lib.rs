// # Cloudflare DNS Backend
//
// Implements the `DnsBackend` trait over the Cloudflare API v4:
//
// - List Zones: GET `/zones?page=N&per_page=50` (the page number doubles as
//   the continuation marker)
// - List DNS Records: GET `/zones/:zone_id/dns_records?name=...&type=A`
// - Batched record changes: POST `/zones/:zone_id/dns_records/batch` with a
//   single `puts` entry; the record `comment` field carries the audit comment
//
// Cloudflare speaks un-dotted names (`www.example.com`); the core speaks
// dotted names (`www.example.com.`). This crate translates at its boundary.
//
// ## Dry-Run Mode
//
// When `dry_run` is set the backend performs all GET requests but skips the
// batch POST, logging the payload it would have sent.
//
// ## Security
//
// The API token never appears in logs; the Debug implementation redacts it.
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use dyndns_core::model::{RecordChange, RecordKind, ResourceRecord, Zone, ZonePage};
use dyndns_core::traits::DnsBackend;
use dyndns_core::{Error, Result};

/// Cloudflare API base URL
const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Zones requested per listing page
const ZONES_PER_PAGE: usize = 50;

/// Cloudflare DNS backend
pub struct CloudflareBackend {
    /// Cloudflare API token; never logged
    api_token: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: perform GET requests but skip change submission
    dry_run: bool,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareBackend")
            .field("api_token", &"<REDACTED>")
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl CloudflareBackend {
    /// Create a new Cloudflare backend
    ///
    /// `api_token` needs Zone:Read and Zone:DNS:Edit permissions. Fails fast
    /// on an empty token.
    pub fn new(api_token: impl Into<String>, dry_run: bool) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token,
            client,
            dry_run,
        })
    }

    /// Create a backend in live mode
    pub fn new_live(api_token: impl Into<String>) -> Result<Self> {
        Self::new(api_token, false)
    }

    /// Create a backend in dry-run mode
    pub fn new_dry_run(api_token: impl Into<String>) -> Result<Self> {
        Self::new(api_token, true)
    }

    /// Perform a GET request and parse the JSON body
    async fn get_json(&self, url: &str, context: &str) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| Error::backend(format!("{}: HTTP request failed: {}", context, e)))?;

        let response = check_status(response, context).await?;

        response
            .json()
            .await
            .map_err(|e| Error::backend(format!("{}: failed to parse response: {}", context, e)))
    }
}

/// Map a non-success HTTP status to a typed error, or pass the response through
async fn check_status(response: reqwest::Response, context: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unable to read error response".to_string());

    Err(match status.as_u16() {
        401 | 403 => Error::backend(format!(
            "{}: authentication failed: invalid API token or insufficient permissions ({})",
            context, status
        )),
        429 => Error::backend(format!("{}: rate limit exceeded ({})", context, status)),
        500..=599 => Error::backend(format!(
            "{}: Cloudflare server error ({}): {}",
            context, status, body
        )),
        _ => Error::backend(format!("{}: {} - {}", context, status, body)),
    })
}

/// Strip the trailing zone separator for the Cloudflare wire form
fn undot(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// Parse a `/zones` response into a ZonePage
fn parse_zone_page(json: &Value, page: usize) -> Result<ZonePage> {
    let result = json["result"]
        .as_array()
        .ok_or_else(|| Error::backend("zone listing: result is not an array"))?;

    let mut zones = Vec::with_capacity(result.len());
    for entry in result {
        let id = entry["id"]
            .as_str()
            .ok_or_else(|| Error::backend("zone listing: zone.id is not a string"))?;
        let name = entry["name"]
            .as_str()
            .ok_or_else(|| Error::backend("zone listing: zone.name is not a string"))?;
        zones.push(Zone::new(id, name));
    }

    let total_pages = json["result_info"]["total_pages"].as_u64().unwrap_or(1) as usize;
    let truncated = page < total_pages;

    Ok(ZonePage {
        zones,
        next_marker: truncated.then(|| (page + 1).to_string()),
        truncated,
    })
}

/// Parse a `/dns_records` response into resource records
fn parse_records(json: &Value, zone_id: &str) -> Result<Vec<ResourceRecord>> {
    let result = json["result"]
        .as_array()
        .ok_or_else(|| Error::backend("record listing: result is not an array"))?;

    let mut records = Vec::with_capacity(result.len());
    for entry in result {
        let name = entry["name"]
            .as_str()
            .ok_or_else(|| Error::backend("record listing: record.name is not a string"))?;
        let kind = match entry["type"].as_str() {
            Some("A") => RecordKind::A,
            // The listing is filtered by type; anything else is skipped.
            _ => continue,
        };
        let value = entry["content"]
            .as_str()
            .ok_or_else(|| Error::backend("record listing: record.content is not a string"))?;
        let ttl = entry["ttl"].as_u64().unwrap_or(0) as u32;

        records.push(ResourceRecord {
            zone_id: zone_id.to_string(),
            name: format!("{}.", undot(name)),
            kind,
            value: value.to_string(),
            ttl,
        });
    }

    Ok(records)
}

#[async_trait]
impl DnsBackend for CloudflareBackend {
    async fn list_zones(&self, marker: Option<&str>) -> Result<ZonePage> {
        let page: usize = match marker {
            None => 1,
            Some(m) => m
                .parse()
                .map_err(|_| Error::backend(format!("zone listing: bad marker: {}", m)))?,
        };

        debug!(page, "listing Cloudflare zones");

        let url = format!(
            "{}/zones?page={}&per_page={}",
            CLOUDFLARE_API_BASE, page, ZONES_PER_PAGE
        );
        let json = self.get_json(&url, "zone listing").await?;
        parse_zone_page(&json, page)
    }

    async fn list_records(
        &self,
        zone_id: &str,
        name: &str,
        kind: RecordKind,
        max: usize,
    ) -> Result<Vec<ResourceRecord>> {
        debug!(zone_id, name, %kind, "listing Cloudflare records");

        let url = format!(
            "{}/zones/{}/dns_records?name={}&type={}&per_page={}",
            CLOUDFLARE_API_BASE,
            zone_id,
            undot(name),
            kind,
            max
        );
        let json = self.get_json(&url, "record listing").await?;
        parse_records(&json, zone_id)
    }

    async fn submit_change(&self, zone_id: &str, change: &RecordChange) -> Result<()> {
        let payload = serde_json::json!({
            "puts": [{
                "name": undot(&change.name),
                "type": change.kind.as_str(),
                "content": change.value,
                "ttl": change.ttl,
                "comment": change.comment,
            }]
        });

        if self.dry_run {
            info!(zone_id, %payload, "[DRY-RUN] would submit change batch");
            return Ok(());
        }

        let url = format!("{}/zones/{}/dns_records/batch", CLOUDFLARE_API_BASE, zone_id);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::dns(format!("change batch: HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error response".to_string());
            return Err(Error::dns(format!(
                "change batch rejected ({}): {}",
                status, body
            )));
        }

        info!(zone_id, name = %change.name, value = %change.value, "change batch accepted");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "cloudflare"
    }
}
