//! # Recursive WHOIS Lookup Client
//!
//! A WHOIS (RFC 3912) client that chases registry referrals: starting from
//! a bootstrap server (IANA by default), it sends the query over bare TCP,
//! looks for a referral to a more authoritative server in the response, and
//! re-queries until no further referral is found. The final response is
//! scanned for an organization name and a network address range across the
//! label dialects of the major registries (ARIN, RIPE, APNIC, LACNIC,
//! JPNIC).
//!
//! ## Quick Start
//!
//! ```no_run
//! use whois_recurse::lookup;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), whois_recurse::LookupError> {
//!     let result = lookup("192.0.2.1").await?;
//!     println!("servers: {}", result.servers.join(" -> "));
//!     println!("organization: {}", result.org_name);
//!     if let Some(range) = &result.address_range {
//!         println!("network: {}", range);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Execution modes
//!
//! Every operation exists in two equivalent forms: async functions
//! ([`resolve`], [`raw_query`]) that suspend cooperatively and support
//! cancellation via [`resolve_with_cancel`], and blocking ones
//! ([`blocking_resolve`], [`blocking_raw_query`]) for embeddings without a
//! runtime. Defaults, timeouts, and retry behavior are carried by
//! [`LookupOptions`].
//!
//! The library holds no state across calls; concurrent lookups are
//! independent.

pub mod config;
pub mod core;
pub mod error;
pub mod resolver;
pub mod transport;

pub use self::core::{AddressRange, LookupOptions, LookupResult, ResponseEncoding};
pub use self::error::LookupError;
pub use self::resolver::{
    blocking_raw_query, blocking_resolve, raw_query, resolve, resolve_with_cancel,
};

/// Resolve `query` with default options: bootstrap at `whois.iana.org:43`,
/// ASCII decoding, 600 s per-operation timeout, 10 attempts per hop,
/// transport errors degrading to an empty response.
pub async fn lookup(query: &str) -> Result<LookupResult, LookupError> {
    resolve(query, &LookupOptions::default()).await
}
