//! Wire protocol for update requests and batch responses
//!
//! Request side: the `hostname` parameter carries up to [`MAX_HOSTS`]
//! comma-separated names; `myip` optionally carries the candidate address,
//! falling back to the request-originating IP. Response side: one line per
//! hostname, in caller order, newline-terminated.

use std::net::Ipv4Addr;
use thiserror::Error;
use tracing::warn;

/// Maximum number of hostnames accepted in one batch
pub const MAX_HOSTS: usize = 20;

/// Outcome of one hostname's update attempt
///
/// The complete response vocabulary. `Good` and `NoChg` carry the IP echoed
/// on their response line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Record updated to the carried IP
    Good(String),
    /// Record already held the carried IP; nothing changed
    NoChg(String),
    /// No zone owns the hostname, or the zone holds no matching record
    NoHost,
    /// Hostname is not a well-formed FQDN; rejected before any backend call
    NotFqdn,
    /// The backend refused or failed the record change
    DnsError,
    /// Unhandled internal failure
    Panic,
}

impl UpdateOutcome {
    /// Bare response code, without any echoed IP
    pub fn code(&self) -> &'static str {
        match self {
            UpdateOutcome::Good(_) => "good",
            UpdateOutcome::NoChg(_) => "nochg",
            UpdateOutcome::NoHost => "nohost",
            UpdateOutcome::NotFqdn => "notfqdn",
            UpdateOutcome::DnsError => "dnserr",
            UpdateOutcome::Panic => "911",
        }
    }
}

impl std::fmt::Display for UpdateOutcome {
    /// Full response line content: code plus echoed IP where the protocol
    /// carries one
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateOutcome::Good(ip) | UpdateOutcome::NoChg(ip) => {
                write!(f, "{} {}", self.code(), ip)
            }
            _ => f.write_str(self.code()),
        }
    }
}

/// Whole-batch request rejection, surfaced as a 400 with a one-line body
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// `hostname` parameter missing or empty
    #[error("notfqdn")]
    MissingHostname,

    /// More than [`MAX_HOSTS`] hostnames submitted
    #[error("numhost")]
    TooManyHosts,

    /// Neither `myip` nor the request-originating IP is usable
    #[error("fatal Parameter myip not specified")]
    NoUsableIp,
}

/// Parsed and validated update parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateParams {
    /// Hostnames in caller order, trimmed, duplicates preserved
    pub hostnames: Vec<String>,

    /// The IPv4 literal to reconcile records towards
    pub myip: String,
}

/// Parse the `hostname`/`myip` parameters of an update request
///
/// A syntactically invalid `myip` is discarded with a warning and the
/// request-originating IP takes its place. Validation and parsing errors here
/// reject the whole batch before any backend call.
pub fn parse_params(
    hostname: Option<&str>,
    myip: Option<&str>,
    source_ip: Option<&str>,
) -> Result<UpdateParams, RequestError> {
    let hostname = hostname
        .filter(|h| !h.trim().is_empty())
        .ok_or(RequestError::MissingHostname)?;

    let hostnames: Vec<String> = hostname.split(',').map(|h| h.trim().to_string()).collect();
    if hostnames.len() > MAX_HOSTS {
        return Err(RequestError::TooManyHosts);
    }

    let myip = select_ip(myip, source_ip).ok_or(RequestError::NoUsableIp)?;

    Ok(UpdateParams { hostnames, myip })
}

/// Pick the candidate IP: a valid `myip` parameter, else the valid
/// request-originating IP, else nothing
fn select_ip(myip: Option<&str>, source_ip: Option<&str>) -> Option<String> {
    if let Some(ip) = myip {
        if ip.parse::<Ipv4Addr>().is_ok() {
            return Some(ip.to_string());
        }
        warn!(myip = ip, "ignoring syntactically invalid myip parameter");
    }

    source_ip
        .filter(|ip| ip.parse::<Ipv4Addr>().is_ok())
        .map(str::to_string)
}

/// Encode per-hostname outcomes into the response body
///
/// One line per hostname in the given order, each newline-terminated. Never
/// produces a blank line.
pub fn encode_batch(results: &[(String, UpdateOutcome)]) -> String {
    let mut body = String::new();
    for (_, outcome) in results {
        body.push_str(&outcome.to_string());
        body.push('\n');
    }
    body
}
