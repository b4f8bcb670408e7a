//! Error types for WHOIS lookups

use std::io;

use thiserror::Error;

/// Transport-level failures surfaced to callers that opted into rethrowing,
/// plus the cancellation outcome of the cancellation-aware resolver.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Cannot connect to WHOIS server {server}: {source}")]
    Connect {
        server: String,
        #[source]
        source: io::Error,
    },

    #[error("Connection to WHOIS server timed out: {server}")]
    ConnectTimeout { server: String },

    #[error("Failed to send query to WHOIS server {server}: {source}")]
    Write {
        server: String,
        #[source]
        source: io::Error,
    },

    #[error("Lookup cancelled")]
    Cancelled,
}
