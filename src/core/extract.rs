//! Field extraction heuristics
//!
//! Registries label the same facts differently: ARIN writes `OrgName:`,
//! RIPE and APNIC use `descr:`/`inetnum:`, LACNIC uses `owner:`, and JPNIC
//! answers with bracketed Japanese labels. Each field is derived
//! independently through an ordered list of matchers; the first matcher
//! that fully succeeds wins and the rest are never consulted. A matcher
//! either produces a complete value or is skipped - partial data is never
//! kept.
//!
//! The bracketed Japanese labels are fixed domain constants; they must stay
//! byte-for-byte as JPNIC emits them.

use std::net::IpAddr;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::config::ARIN_WHOIS_SERVER;
use crate::core::types::AddressRange;

static ORG_MATCHERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // JPNIC bracket label, optionally preceded by a section marker
        // such as "f. "
        r"(?im)^\s*(?:[a-z]\.\s+)?\[(?:組織名|Organization)\]\s*(?P<value>.+)$",
        // Western registries
        r"(?im)^\s*(?:OrgName|descr|Registrant Organization|owner):\s*(?P<value>.+)$",
        // Fallback labels
        r"(?im)^\s*(?:Organization|org-name):\s*(?P<value>.+)$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("organization pattern must compile"))
    .collect()
});

static RANGE_MATCHERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // JPNIC network address label
        r"(?im)^\s*(?:[a-z]\.\s+)?\[(?:IPネットワークアドレス|Network Number)\]\s*(?P<value>.+)$",
        // Western registries
        r"(?im)^\s*(?:NetRange|CIDR|inetnum|inet6num):\s*(?P<value>.+)$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("address range pattern must compile"))
    .collect()
});

// ARIN closes its detailed output with a one-line summary of the form
// "<organization> <begin> - <end>".
static ARIN_SUMMARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^(?P<org>\S.*?)\s+(?P<begin>[0-9A-Fa-f.:]+)\s*-\s*(?P<end>[0-9A-Fa-f.:]+)\s*$")
        .expect("ARIN summary pattern must compile")
});

// Field labels that themselves match the summary shape and must not be
// mistaken for an organization name.
const BARE_FIELD_LABELS: [&str; 3] = ["NetRange:", "CIDR:", "inetnum:"];

/// Derive the organization name and address range from the final response,
/// given the full chain of servers that produced it. Absence of a match
/// leaves a field at its empty/absent default; this is never an error.
pub fn extract_fields(response: &str, servers: &[String]) -> (String, Option<AddressRange>) {
    let mut org_name = extract_org_name(response).unwrap_or_default();
    let mut address_range = extract_address_range(response);

    let last_is_arin = servers
        .last()
        .is_some_and(|server| server.eq_ignore_ascii_case(ARIN_WHOIS_SERVER));
    if last_is_arin {
        if let Some((summary_org, summary_range)) = arin_summary(response) {
            debug!("ARIN summary line supersedes generic extraction");
            org_name = summary_org;
            address_range = Some(summary_range);
        }
    }

    (org_name, address_range)
}

fn extract_org_name(response: &str) -> Option<String> {
    for matcher in ORG_MATCHERS.iter() {
        if let Some(caps) = matcher.captures(response) {
            let value = caps["value"].trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

fn extract_address_range(response: &str) -> Option<AddressRange> {
    for matcher in RANGE_MATCHERS.iter() {
        // A labeled value that does not parse as a range is a miss, not an
        // error; later occurrences of the same labels still count.
        for caps in matcher.captures_iter(response) {
            if let Some(range) = AddressRange::parse(&caps["value"]) {
                return Some(range);
            }
        }
    }
    None
}

/// The last summary-shaped line of an ARIN response, unless its
/// organization fragment is a bare repeated field label.
fn arin_summary(response: &str) -> Option<(String, AddressRange)> {
    let mut last_match = None;
    for caps in ARIN_SUMMARY.captures_iter(response) {
        let (Ok(begin), Ok(end)) = (
            caps["begin"].parse::<IpAddr>(),
            caps["end"].parse::<IpAddr>(),
        ) else {
            continue;
        };
        last_match = Some((caps["org"].trim().to_string(), AddressRange::new(begin, end)));
    }

    let (org, range) = last_match?;
    if BARE_FIELD_LABELS.iter().any(|label| org.eq_ignore_ascii_case(label)) {
        return None;
    }
    Some((org, range))
}
