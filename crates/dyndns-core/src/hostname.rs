//! Hostname validation and normalization
//!
//! Update requests carry bare hostnames (`www.example.com`). Before any
//! backend call the name is checked for fully-qualified shape and normalized
//! to the zone-separator form (`www.example.com.`) used for all comparisons.
//!
//! Well-formedness per RFC 1035, restricted to what the endpoint accepts:
//! 4–253 characters total, dot-separated labels of 1–63 alphanumerics and
//! internal hyphens, and a final label of 2–63 alphabetic characters.
//! Malformed names never cost a backend round-trip.

/// Check that a raw (un-dotted) hostname is a well-formed FQDN
pub fn is_well_formed_fqdn(host: &str) -> bool {
    if host.len() < 4 || host.len() > 253 {
        return false;
    }

    let labels: Vec<&str> = host.split('.').collect();
    // Need at least one label plus a TLD, and no empty labels
    // (leading/trailing/double dots all produce one).
    if labels.len() < 2 {
        return false;
    }

    let Some((tld, front)) = labels.split_last() else {
        return false;
    };

    for label in front {
        if label.is_empty() || label.len() > 63 {
            return false;
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return false;
        }
        if label.starts_with('-') || label.ends_with('-') {
            return false;
        }
    }

    // Final label: alphabetic only, 2-63 chars
    tld.len() >= 2 && tld.len() <= 63 && tld.chars().all(|c| c.is_ascii_alphabetic())
}

/// Normalize a hostname to carry the trailing zone separator
pub fn normalize(host: &str) -> String {
    if host.ends_with('.') {
        host.to_string()
    } else {
        format!("{}.", host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_names() {
        assert!(is_well_formed_fqdn("www.example.com"));
        assert!(is_well_formed_fqdn("example.com"));
        assert!(is_well_formed_fqdn("a-b.example.co"));
        assert!(is_well_formed_fqdn("deep.nested.sub.example.org"));
        assert!(is_well_formed_fqdn("xn--bcher-kva.example.de"));
    }

    #[test]
    fn rejects_malformed_names() {
        assert!(!is_well_formed_fqdn(""));
        assert!(!is_well_formed_fqdn("localhost"));
        assert!(!is_well_formed_fqdn("a.b"));
        assert!(!is_well_formed_fqdn("www*.example.com"));
        assert!(!is_well_formed_fqdn("*invalid"));
        assert!(!is_well_formed_fqdn("-leading.example.com"));
        assert!(!is_well_formed_fqdn("trailing-.example.com"));
        assert!(!is_well_formed_fqdn("double..example.com"));
        assert!(!is_well_formed_fqdn("www.example.com."));
        assert!(!is_well_formed_fqdn("www.example.c0m"));
        assert!(!is_well_formed_fqdn("www.example.c"));
    }

    #[test]
    fn rejects_oversized_names() {
        let label = "a".repeat(63);
        let long = format!("{}.{}.{}.{}.com", label, label, label, label);
        assert!(long.len() > 253);
        assert!(!is_well_formed_fqdn(&long));

        let too_long_label = format!("{}.com", "a".repeat(64));
        assert!(!is_well_formed_fqdn(&too_long_label));
    }

    #[test]
    fn normalize_appends_separator_once() {
        assert_eq!(normalize("www.example.com"), "www.example.com.");
        assert_eq!(normalize("www.example.com."), "www.example.com.");
    }
}
