//! Query statement dialects
//!
//! WHOIS servers agree on the wire format (one line, CRLF terminated) but
//! not on the statement itself: Verisign-operated registries need a `domain`
//! prefix to suppress nameserver matches, ARIN takes `n +` for full network
//! detail on address queries, and JPNIC switches to English output with a
//! `/e` suffix.

use std::net::IpAddr;

use crate::config::{
    ARIN_WHOIS_SERVER, INTERNIC_WHOIS_SERVER, JPNIC_WHOIS_SERVER, VERISIGN_WHOIS_SERVER,
};

/// Produce the exact statement to send to `server` for `query`, CRLF not
/// included.
pub fn build_statement(server: &str, query: &str) -> String {
    let server = server.to_ascii_lowercase();
    match server.as_str() {
        INTERNIC_WHOIS_SERVER | VERISIGN_WHOIS_SERVER => format!("domain {query}"),
        ARIN_WHOIS_SERVER if query.parse::<IpAddr>().is_ok() => format!("n + {query}"),
        JPNIC_WHOIS_SERVER => format!("{query}/e"),
        _ => query.to_string(),
    }
}
