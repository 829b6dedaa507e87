//! Zone directory and hostname-to-zone resolution
//!
//! The directory is loaded once per engine session by walking the backend's
//! paginated zone listing to exhaustion, and is read-only afterwards. Zone
//! resolution is a separator-aware suffix match: a zone owns a hostname when
//! the hostname ends with the zone name at a label boundary. With nested
//! zones (`example.com.` alongside `sub.example.com.`) the longest matching
//! suffix wins, so the most specific zone is always selected regardless of
//! backend listing order.

use tracing::debug;

use crate::Result;
use crate::model::Zone;
use crate::traits::DnsBackend;

/// Immutable directory of the backend's authoritative zones
///
/// Holds the accumulated result of a full paginated listing. Safe to share
/// read-only across hostname updates within a session; never refreshed in
/// place — a new session loads a new directory.
#[derive(Debug, Clone, Default)]
pub struct ZoneDirectory {
    zones: Vec<Zone>,
}

impl ZoneDirectory {
    /// Build a directory from an already-fetched zone list (tests, fixtures)
    pub fn from_zones(zones: Vec<Zone>) -> Self {
        Self { zones }
    }

    /// Load the complete zone listing from the backend
    ///
    /// Follows the continuation marker until the backend signals no more
    /// pages. A failure on any page aborts the whole load; no partial
    /// directory is ever returned.
    pub async fn load(backend: &dyn DnsBackend) -> Result<Self> {
        let mut zones = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let page = backend.list_zones(marker.as_deref()).await?;
            zones.extend(page.zones);

            if !page.truncated {
                break;
            }
            marker = page.next_marker;
        }

        debug!(count = zones.len(), "zone directory loaded");
        Ok(Self { zones })
    }

    /// Resolve the zone owning a hostname, or `None`
    ///
    /// `hostname` must already be normalized with the trailing separator.
    /// Among multiple matching zones the longest zone name wins.
    pub fn find_zone(&self, hostname: &str) -> Option<&Zone> {
        self.zones
            .iter()
            .filter(|zone| suffix_matches(hostname, &zone.name))
            .max_by_key(|zone| zone.name.len())
    }

    /// Number of zones in the directory
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Check whether the directory is empty
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

/// Separator-aware suffix match: `hostname` equals the zone name, or ends
/// with it immediately after a label boundary. Not a substring match —
/// `wexample.com.` does not belong to `example.com.`.
fn suffix_matches(hostname: &str, zone_name: &str) -> bool {
    if hostname == zone_name {
        return true;
    }
    hostname
        .strip_suffix(zone_name)
        .is_some_and(|prefix| prefix.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> ZoneDirectory {
        ZoneDirectory::from_zones(vec![
            Zone::new("Z1", "example.com."),
            Zone::new("Z2", "example.org."),
            Zone::new("Z3", "sub.example.com."),
        ])
    }

    #[test]
    fn resolves_hostname_to_owning_zone() {
        let dir = directory();
        let zone = dir.find_zone("www.example.org.").unwrap();
        assert_eq!(zone.id, "Z2");
    }

    #[test]
    fn zone_apex_matches_its_own_zone() {
        let dir = directory();
        let zone = dir.find_zone("example.com.").unwrap();
        assert_eq!(zone.id, "Z1");
    }

    #[test]
    fn no_matching_suffix_yields_none() {
        let dir = directory();
        assert!(dir.find_zone("www.example.net.").is_none());
    }

    #[test]
    fn suffix_match_respects_label_boundaries() {
        let dir = directory();
        // Ends with "example.com." as a substring, but not at a label boundary.
        assert!(dir.find_zone("wexample.com.").is_none());
    }

    #[test]
    fn nested_zone_longest_suffix_wins() {
        // Z3 is listed after Z1; listing order must not decide.
        let dir = directory();
        let zone = dir.find_zone("host.sub.example.com.").unwrap();
        assert_eq!(zone.id, "Z3");

        // A host directly under the parent zone still resolves to the parent.
        let zone = dir.find_zone("www.example.com.").unwrap();
        assert_eq!(zone.id, "Z1");
    }
}
