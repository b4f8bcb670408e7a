//! Referral-chasing resolver (cooperatively-suspending mode)

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::RETRY_COOLDOWN_MS;
use crate::core::{LookupOptions, LookupResult, build_statement, find_referral};
use crate::error::LookupError;
use crate::transport::async_channel;

/// Resolve `query` by chasing referrals from the bootstrap server until a
/// hop names no further server, or names the server it came from.
///
/// Each hop retries transient transport failures up to
/// `options.max_retries` attempts with a short cooldown; an exhausted hop
/// degrades to an empty response unless `options.rethrow_transport_errors`
/// is set. Known limitation: two or more distinct servers that mutually
/// refer to each other are chased forever - only the single-step
/// self-reference is detected.
pub async fn resolve(query: &str, options: &LookupOptions) -> Result<LookupResult, LookupError> {
    let timeout = Duration::from_secs(options.timeout_secs);
    let mut servers: Vec<String> = Vec::new();
    let mut current = options.server.clone();
    let mut port = options.port;

    loop {
        servers.push(current.clone());
        let raw = fetch_with_retry(query, &current, port, options, timeout).await?;

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

/// Cancellation-aware variant of [`resolve`]. Cancelling the token aborts
/// any in-flight connect/read/write and surfaces as
/// [`LookupError::Cancelled`].
pub async fn resolve_with_cancel(
    query: &str,
    options: &LookupOptions,
    cancel: &CancellationToken,
) -> Result<LookupResult, LookupError> {
    tokio::select! {
        _ = cancel.cancelled() => Err(LookupError::Cancelled),
        result = resolve(query, options) => result,
    }
}

/// Query a single server once, with no referral chasing and no field
/// extraction. Transport failures degrade to an empty response unless
/// `options.rethrow_transport_errors` is set.
pub async fn raw_query(query: &str, options: &LookupOptions) -> Result<String, LookupError> {
    let timeout = Duration::from_secs(options.timeout_secs);
    let statement = build_statement(&options.server, query);
    match async_channel::fetch(&options.server, options.port, &statement, options.encoding, timeout).await {
        Ok(text) => Ok(text),
        Err(e) if options.rethrow_transport_errors => Err(e),
        Err(e) => {
            debug!("raw query to {} failed, returning empty response: {}", options.server, e);
            Ok(String::new())
        }
    }
}

async fn fetch_with_retry(
    query: &str,
    server: &str,
    port: u16,
    options: &LookupOptions,
    timeout: Duration,
) -> Result<String, LookupError> {
    let statement = build_statement(server, query);
    let mut attempts = 0u32;

    loop {
        match async_channel::fetch(server, port, &statement, options.encoding, timeout).await {
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
                tokio::time::sleep(Duration::from_millis(RETRY_COOLDOWN_MS)).await;
            }
        }
    }
}
