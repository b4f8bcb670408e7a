//! Integration tests for the async resolver against scripted loopback
//! WHOIS peers.

use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use whois_recurse::{LookupError, LookupOptions, raw_query, resolve, resolve_with_cancel};

/// Bind a loopback listener that answers one connection with `response`
/// after reading the query line, then closes, as RFC 3912 requires.
async fn spawn_whois_peer(response: String) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            let mut buffer = [0u8; 1024];
            let mut request = Vec::new();
            loop {
                match stream.read(&mut buffer).await {
                    Ok(0) => break,
                    Ok(n) => {
                        request.extend_from_slice(&buffer[..n]);
                        if request.windows(2).any(|w| w == b"\r\n") {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    addr
}

fn options_for(server: &str, port: u16) -> LookupOptions {
    LookupOptions {
        server: server.to_string(),
        port,
        timeout_secs: 5,
        max_retries: 2,
        ..LookupOptions::default()
    }
}

/// Reserve a port with nothing listening on it.
async fn unused_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

#[tokio::test]
async fn test_single_hop_without_referral() {
    let response = "OrgName:        Example Corp\r\nNetRange:       10.0.0.0 - 10.0.0.255\r\n";
    let addr = spawn_whois_peer(response.to_string()).await;

    let options = options_for("127.0.0.1", addr.port());
    let result = resolve("192.0.2.1", &options).await.unwrap();

    assert_eq!(result.servers, vec!["127.0.0.1".to_string()]);
    assert_eq!(result.raw, response);
    assert_eq!(result.org_name, "Example Corp");
    assert_eq!(result.address_range.unwrap().to_string(), "10.0.0.0 - 10.0.0.255");
}

#[tokio::test]
async fn test_follows_referral_to_second_server() {
    let final_response = "OrgName:        Authoritative Org\r\n";
    let second = spawn_whois_peer(final_response.to_string()).await;
    let first = spawn_whois_peer(format!(
        "Registrar Whois Server: localhost:{}\r\n",
        second.port()
    ))
    .await;

    let options = options_for("127.0.0.1", first.port());
    let result = resolve("example.com", &options).await.unwrap();

    assert_eq!(result.servers, vec!["127.0.0.1".to_string(), "localhost".to_string()]);
    assert_eq!(result.raw, final_response);
    assert_eq!(result.org_name, "Authoritative Org");
}

#[tokio::test]
async fn test_self_referral_halts_with_one_hop() {
    // Referral host differs only in case from the queried server.
    let addr = spawn_whois_peer("whois: LOCALHOST\r\n".to_string()).await;

    let options = options_for("localhost", addr.port());
    let result = resolve("example.net", &options).await.unwrap();

    assert_eq!(result.servers, vec!["localhost".to_string()]);
    assert_eq!(result.raw, "whois: LOCALHOST\r\n");
}

#[tokio::test]
async fn test_unreachable_server_degrades_to_empty_result() {
    let port = unused_port().await;

    let options = options_for("127.0.0.1", port);
    let result = resolve("example.org", &options).await.unwrap();

    assert_eq!(result.servers, vec!["127.0.0.1".to_string()]);
    assert_eq!(result.raw, "");
    assert_eq!(result.org_name, "");
    assert_eq!(result.address_range, None);
}

#[tokio::test]
async fn test_unreachable_server_rethrows_when_opted_in() {
    let port = unused_port().await;

    let mut options = options_for("127.0.0.1", port);
    options.rethrow_transport_errors = true;

    let err = resolve("example.org", &options).await.unwrap_err();
    assert!(matches!(err, LookupError::Connect { .. }));
}

#[tokio::test]
async fn test_raw_query_never_chases_referrals() {
    let response = "refer: whois.elsewhere.invalid\r\n";
    let addr = spawn_whois_peer(response.to_string()).await;

    let options = options_for("127.0.0.1", addr.port());
    let raw = raw_query("example.com", &options).await.unwrap();

    // The referral line comes back verbatim; no second hop is attempted.
    assert_eq!(raw, response);
}

#[tokio::test]
async fn test_cancellation_surfaces_as_cancelled() {
    let addr = spawn_whois_peer("OrgName: Never Seen\r\n".to_string()).await;

    let options = options_for("127.0.0.1", addr.port());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = resolve_with_cancel("example.com", &options, &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::Cancelled));
}
