use std::fmt;
use std::net::IpAddr;

use cidr::IpCidr;

use crate::config::{
    DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECONDS, DEFAULT_WHOIS_PORT, DEFAULT_WHOIS_SERVER,
};
use crate::core::extract::extract_fields;

/// An inclusive begin/end pair of IP addresses describing a network block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRange {
    pub begin: IpAddr,
    pub end: IpAddr,
}

impl AddressRange {
    pub fn new(begin: IpAddr, end: IpAddr) -> Self {
        Self { begin, end }
    }

    /// Parse a range from registry text: a dashed pair
    /// (`10.0.0.0 - 10.0.0.255`), CIDR notation (`10.0.0.0/24`), or a bare
    /// address. Returns `None` when the text is neither; callers treat that
    /// as a heuristic miss, never an error.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();

        if let Some((begin, end)) = text.split_once('-') {
            let begin: IpAddr = begin.trim().parse().ok()?;
            let end: IpAddr = end.trim().parse().ok()?;
            return Some(Self::new(begin, end));
        }

        if let Ok(cidr) = text.parse::<IpCidr>() {
            return Some(Self::new(cidr.first_address(), cidr.last_address()));
        }

        if let Ok(ip) = text.parse::<IpAddr>() {
            return Some(Self::new(ip, ip));
        }

        None
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.begin, self.end)
    }
}

/// Byte-to-text codec applied to a complete response body.
///
/// RFC 3912 carries no charset signalling, so the caller picks the codec.
/// `Ascii` mirrors the protocol's historical default: non-ASCII bytes
/// degrade to `?` rather than failing the lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ResponseEncoding {
    #[default]
    Ascii,
    Utf8,
    Latin1,
}

impl ResponseEncoding {
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            ResponseEncoding::Ascii => bytes
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { '?' })
                .collect(),
            ResponseEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            ResponseEncoding::Latin1 => bytes.iter().map(|&b| b as char).collect(),
        }
    }
}

/// Per-lookup settings; `Default` reflects the configured constants.
#[derive(Debug, Clone)]
pub struct LookupOptions {
    /// Bootstrap server queried on the first hop.
    pub server: String,
    /// Port of the bootstrap server. Referral ports are taken from the
    /// referral itself, defaulting to 43.
    pub port: u16,
    pub encoding: ResponseEncoding,
    /// Applies per connect attempt and per read/write operation, never to a
    /// whole resolution.
    pub timeout_secs: u64,
    /// Connection attempts per hop before the hop degrades or rethrows.
    pub max_retries: u32,
    /// When set, a hop whose final attempt fails propagates the transport
    /// error instead of degrading to an empty response.
    pub rethrow_transport_errors: bool,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            server: DEFAULT_WHOIS_SERVER.to_string(),
            port: DEFAULT_WHOIS_PORT,
            encoding: ResponseEncoding::Ascii,
            timeout_secs: DEFAULT_TIMEOUT_SECONDS,
            max_retries: DEFAULT_MAX_RETRIES,
            rethrow_transport_errors: false,
        }
    }
}

/// Final outcome of a resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResult {
    /// Hostnames that responded, in query order; the first element is the
    /// bootstrap server, the last produced `raw`.
    pub servers: Vec<String>,
    /// Raw text of the final hop.
    pub raw: String,
    /// Extracted organization name; empty when no heuristic matched.
    pub org_name: String,
    /// Extracted network block; `None` when no heuristic matched.
    pub address_range: Option<AddressRange>,
}

impl LookupResult {
    /// Build the result from the finished server chain and the last hop's
    /// text. Field extraction happens here, exactly once.
    pub(crate) fn from_chain(servers: Vec<String>, raw: String) -> Self {
        let (org_name, address_range) = extract_fields(&raw, &servers);
        Self {
            servers,
            raw,
            org_name,
            address_range,
        }
    }
}
