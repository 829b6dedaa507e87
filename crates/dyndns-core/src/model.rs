//! Data model for zones and records
//!
//! These types mirror what the record backend exposes: zones are authoritative
//! namespace suffixes, resource records are the address entries inside them.
//! Zone and record names always carry the trailing `.` inside this crate;
//! backends that speak un-dotted names translate at their boundary.

use serde::{Deserialize, Serialize};

/// An authoritative DNS zone managed by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Opaque provider-assigned zone identifier
    pub id: String,

    /// Fully-qualified zone name with trailing `.` (e.g. `example.com.`)
    pub name: String,
}

impl Zone {
    /// Create a zone, normalizing the name to carry a trailing `.`
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let mut name = name.into();
        if !name.ends_with('.') {
            name.push('.');
        }
        Self {
            id: id.into(),
            name,
        }
    }
}

/// DNS record kind handled by this system
///
/// The endpoint manages IPv4 address records only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    /// A record (IPv4 address)
    A,
}

impl RecordKind {
    /// Wire name of the record kind (e.g. `"A"`)
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::A => "A",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resource record as read from the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Owning zone id
    pub zone_id: String,

    /// Fully-qualified record name with trailing `.`
    pub name: String,

    /// Record kind
    pub kind: RecordKind,

    /// Current record value (an IPv4 literal)
    pub value: String,

    /// Time-to-live in seconds
    pub ttl: u32,
}

/// A single record upsert to submit to the backend
///
/// Changes are submitted one per batch: either the record is updated or it is
/// not, with no partial multi-record state to reconcile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordChange {
    /// Fully-qualified record name with trailing `.`
    pub name: String,

    /// Record kind
    pub kind: RecordKind,

    /// New record value
    pub value: String,

    /// Time-to-live to set
    pub ttl: u32,

    /// Human-readable audit comment attached to the change
    pub comment: String,
}

/// One page of a paginated zone listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZonePage {
    /// Zones on this page
    pub zones: Vec<Zone>,

    /// Continuation marker to request the next page
    pub next_marker: Option<String>,

    /// Whether more pages remain after this one
    pub truncated: bool,
}
