//! Referral detection
//!
//! A WHOIS response may name a more authoritative server in any of several
//! registry-specific shapes. The matchers below are tried in a fixed
//! priority order and the first matcher that hits anywhere in the document
//! wins; their order is a behavioral invariant, since real responses often
//! contain more than one shape.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::config::DEFAULT_WHOIS_PORT;

/// A server to continue the chain on, taken from a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Referral {
    pub host: String,
    pub port: u16,
}

static REFERRAL_MATCHERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // ARIN: ReferralServer: whois://whois.ripe.net
        r"(?im)^\s*ReferralServer:\s*whois://(?P<host>[^\s:/]+)(?::(?P<port>\d+))?",
        // Registrar responses: [Registrar ]Whois Server: whois.example.com
        r"(?im)^\s*(?:Registrar\s+)?Whois Server:\s*(?P<host>[^\s:/]+)(?::(?P<port>\d+))?",
        // IANA: refer: whois.nic.example
        r"(?im)^\s*refer:\s*(?P<host>[^\s:/]+)(?::(?P<port>\d+))?",
        // IANA TLD records: whois: whois.nic.example
        r"(?im)^\s*whois:\s*(?P<host>[^\s:/]+)(?::(?P<port>\d+))?",
        // Free-form remarks embedding a whois.* hostname
        r"(?im)^\s*remarks:.*?(?P<host>whois\.[A-Za-z0-9-][A-Za-z0-9.-]*\.[A-Za-z]{2,})",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("referral pattern must compile"))
    .collect()
});

/// Decide whether `response` refers the query to another server.
///
/// Returns `None` when no matcher hits, or when the named host is the
/// currently queried one (case-insensitive) - a self-referral ends the
/// chain rather than extending it.
pub fn find_referral(response: &str, current_server: &str) -> Option<Referral> {
    for matcher in REFERRAL_MATCHERS.iter() {
        let Some(caps) = matcher.captures(response) else {
            continue;
        };

        let host = caps["host"].trim().to_string();
        let port = caps
            .name("port")
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(DEFAULT_WHOIS_PORT);

        if host.eq_ignore_ascii_case(current_server) {
            debug!("referral to {} points back at the current server, stopping", host);
            return None;
        }

        debug!("found referral to {}:{}", host, port);
        return Some(Referral { host, port });
    }
    None
}
