use clap::Parser;

use crate::core::ResponseEncoding;

// WHOIS bootstrap configuration
pub const DEFAULT_WHOIS_SERVER: &str = "whois.iana.org";
pub const DEFAULT_WHOIS_PORT: u16 = 43;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 600;
pub const DEFAULT_MAX_RETRIES: u32 = 10;

// Cooldown between failed connection attempts against the same server
pub const RETRY_COOLDOWN_MS: u64 = 100;

// Pacing delay while waiting on a peer that has produced no data yet
pub const READ_PACING_MS: u64 = 50;

// Upper bound on a single response body
pub const MAX_RESPONSE_BYTES: usize = 1_000_000;

// Registry servers with known query dialects
pub const ARIN_WHOIS_SERVER: &str = "whois.arin.net";
pub const JPNIC_WHOIS_SERVER: &str = "whois.nic.ad.jp";
pub const INTERNIC_WHOIS_SERVER: &str = "whois.internic.net";
pub const VERISIGN_WHOIS_SERVER: &str = "whois.verisign-grs.com";

#[derive(Parser)]
#[command(author, version, about = "A recursive WHOIS lookup client")]
pub struct Cli {
    /// Domain name or IP address to look up
    pub query: String,

    /// Bootstrap WHOIS server
    #[arg(short, long, default_value = DEFAULT_WHOIS_SERVER)]
    pub server: String,

    /// WHOIS server port
    #[arg(short, long, default_value_t = DEFAULT_WHOIS_PORT)]
    pub port: u16,

    /// Response text encoding
    #[arg(long, value_enum, default_value = "ascii")]
    pub encoding: ResponseEncoding,

    /// Per-operation timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout: u64,

    /// Connection attempts per hop
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    /// Propagate transport errors instead of degrading to an empty response
    #[arg(long)]
    pub rethrow: bool,

    /// Query the bootstrap server once, without chasing referrals
    #[arg(long)]
    pub no_recurse: bool,

    /// Use blocking TCP connections (non-async)
    #[arg(long)]
    pub blocking: bool,

    /// Print the raw response after the extracted fields
    #[arg(long)]
    pub raw: bool,

    /// Enable debug output
    #[arg(short, long)]
    pub debug: bool,

    /// Enable trace output (extremely verbose)
    #[arg(short, long)]
    pub trace: bool,
}
