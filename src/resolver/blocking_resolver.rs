//! Referral-chasing resolver (thread-blocking mode)
//!
//! Same chain-following semantics as the async resolver; the calling
//! thread is blocked for the duration of every connect, read, write, and
//! retry cooldown. Only the per-operation timeouts bound a lookup in this
//! mode.

use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::RETRY_COOLDOWN_MS;
use crate::core::{LookupOptions, LookupResult, build_statement, find_referral};
use crate::error::LookupError;
use crate::transport::blocking_channel;

/// Blocking counterpart of [`resolve`](crate::resolver::resolve).
pub fn blocking_resolve(query: &str, options: &LookupOptions) -> Result<LookupResult, LookupError> {
    let timeout = Duration::from_secs(options.timeout_secs);
    let mut servers: Vec<String> = Vec::new();
    let mut current = options.server.clone();
    let mut port = options.port;

    loop {
        servers.push(current.clone());
        let raw = fetch_with_retry(query, &current, port, options, timeout)?;

        match find_referral(&raw, &current) {
            Some(referral) => {
                debug!("following referral from {} to {}:{}", current, referral.host, referral.port);
                current = referral.host;
                port = referral.port;
            }
            None => return Ok(LookupResult::from_chain(servers, raw)),
        }
    }
}

/// Blocking counterpart of [`raw_query`](crate::resolver::raw_query).
pub fn blocking_raw_query(query: &str, options: &LookupOptions) -> Result<String, LookupError> {
    let timeout = Duration::from_secs(options.timeout_secs);
    let statement = build_statement(&options.server, query);
    match blocking_channel::fetch(&options.server, options.port, &statement, options.encoding, timeout) {
        Ok(text) => Ok(text),
        Err(e) if options.rethrow_transport_errors => Err(e),
        Err(e) => {
            debug!("raw query to {} failed, returning empty response: {}", options.server, e);
            Ok(String::new())
        }
    }
}

fn fetch_with_retry(
    query: &str,
    server: &str,
    port: u16,
    options: &LookupOptions,
    timeout: Duration,
) -> Result<String, LookupError> {
    let statement = build_statement(server, query);
    let mut attempts = 0u32;

    loop {
        match blocking_channel::fetch(server, port, &statement, options.encoding, timeout) {
            Ok(text) => return Ok(text),
            Err(e) => {
                attempts += 1;
                warn!("attempt {}/{} against {} failed: {}", attempts, options.max_retries, server, e);

                if attempts >= options.max_retries {
                    if options.rethrow_transport_errors {
                        return Err(e);
                    }
                    debug!("retries exhausted for {}, degrading to empty response", server);
                    return Ok(String::new());
                }
                thread::sleep(Duration::from_millis(RETRY_COOLDOWN_MS));
            }
        }
    }
}
