//! Integration tests for the blocking resolver against scripted loopback
//! WHOIS peers.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::thread;

use whois_recurse::{LookupError, LookupOptions, blocking_raw_query, blocking_resolve};

/// Bind a loopback listener that answers one connection with `response`
/// after reading the query line, then closes.
fn spawn_whois_peer(response: String) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buffer = [0u8; 1024];
            let mut request = Vec::new();
            loop {
                match stream.read(&mut buffer) {
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
            let _ = stream.write_all(response.as_bytes());
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

fn unused_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

#[test]
fn test_blocking_single_hop() {
    let response = "inetnum:        193.0.0.0 - 193.0.7.255\r\ndescr:          Example Networks\r\n";
    let addr = spawn_whois_peer(response.to_string());

    let options = options_for("127.0.0.1", addr.port());
    let result = blocking_resolve("193.0.0.1", &options).unwrap();

    assert_eq!(result.servers, vec!["127.0.0.1".to_string()]);
    assert_eq!(result.raw, response);
    assert_eq!(result.org_name, "Example Networks");
    assert_eq!(result.address_range.unwrap().to_string(), "193.0.0.0 - 193.0.7.255");
}

#[test]
fn test_blocking_follows_referral() {
    let final_response = "owner:          Example LACNIC Org\r\n";
    let second = spawn_whois_peer(final_response.to_string());
    let first = spawn_whois_peer(format!("refer: localhost:{}\r\n", second.port()));

    let options = options_for("127.0.0.1", first.port());
    let result = blocking_resolve("example.com", &options).unwrap();

    assert_eq!(result.servers, vec!["127.0.0.1".to_string(), "localhost".to_string()]);
    assert_eq!(result.org_name, "Example LACNIC Org");
}

#[test]
fn test_blocking_degrades_to_empty_result() {
    let port = unused_port();

    let options = options_for("127.0.0.1", port);
    let result = blocking_resolve("example.org", &options).unwrap();

    assert_eq!(result.raw, "");
    assert_eq!(result.org_name, "");
    assert_eq!(result.address_range, None);
}

#[test]
fn test_blocking_rethrows_when_opted_in() {
    let port = unused_port();

    let mut options = options_for("127.0.0.1", port);
    options.rethrow_transport_errors = true;

    let err = blocking_resolve("example.org", &options).unwrap_err();
    assert!(matches!(err, LookupError::Connect { .. }));
}

#[test]
fn test_blocking_raw_query_never_chases() {
    let response = "whois: whois.elsewhere.invalid\r\n";
    let addr = spawn_whois_peer(response.to_string());

    let options = options_for("127.0.0.1", addr.port());
    let raw = blocking_raw_query("example.com", &options).unwrap();

    assert_eq!(raw, response);
}
