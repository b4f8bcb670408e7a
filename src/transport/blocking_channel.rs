//! Thread-blocking transport
//!
//! Same round trip as the async channel over `std::net`, for embeddings
//! that cannot carry an async runtime. Timeouts are set on the socket per
//! operation; there is no mid-operation cancellation in this mode.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::{MAX_RESPONSE_BYTES, READ_PACING_MS};
use crate::core::ResponseEncoding;
use crate::error::LookupError;

/// Blocking counterpart of [`async_channel::fetch`](super::async_channel::fetch).
pub fn fetch(
    server: &str,
    port: u16,
    statement: &str,
    encoding: ResponseEncoding,
    timeout: Duration,
) -> Result<String, LookupError> {
    let address = format!("{}:{}", server, port);
    debug!("connecting to WHOIS server {}", address);

    let mut stream = connect(server, port, &address, timeout)?;

    stream
        .set_read_timeout(Some(timeout))
        .and_then(|_| stream.set_write_timeout(Some(timeout)))
        .map_err(|e| LookupError::Connect {
            server: address.clone(),
            source: e,
        })?;

    if let Err(e) = stream.set_nodelay(true) {
        warn!("Failed to set TCP_NODELAY: {}", e);
    }

    // WHOIS protocol expects a CRLF-terminated query line
    let line = format!("{}\r\n", statement);
    stream
        .write_all(line.as_bytes())
        .and_then(|_| stream.flush())
        .map_err(|e| LookupError::Write {
            server: address.clone(),
            source: e,
        })?;

    let mut collected: Vec<u8> = Vec::new();
    let mut buffer = [0u8; 8192];
    let read_start = Instant::now();

    loop {
        match stream.read(&mut buffer) {
            Ok(0) => {
                // A zero-byte read only ends the response once something has
                // been accumulated; before that, the read window is bounded
                // by the timeout alone.
                if !collected.is_empty() || read_start.elapsed() >= timeout {
                    break;
                }
                std::thread::sleep(Duration::from_millis(READ_PACING_MS));
            }
            Ok(n) => {
                collected.extend_from_slice(&buffer[..n]);
                if collected.len() > MAX_RESPONSE_BYTES {
                    debug!("response exceeded size limit ({} bytes), truncating", MAX_RESPONSE_BYTES);
                    break;
                }
                if read_start.elapsed() > timeout {
                    debug!("read window elapsed after {} bytes", collected.len());
                    break;
                }
            }
            Err(e) => {
                // Read timeouts surface as WouldBlock or TimedOut depending
                // on the platform; both stop the read and keep the partial
                // response, as does any other mid-read failure.
                debug!("read stopped after {} bytes, keeping partial response: {}", collected.len(), e);
                break;
            }
        }
    }

    debug!("received {} bytes from {}", collected.len(), address);
    Ok(encoding.decode(&collected))
}

// connect_timeout takes a single resolved address, so resolve the host
// ourselves and try each candidate in order.
fn connect(server: &str, port: u16, address: &str, timeout: Duration) -> Result<TcpStream, LookupError> {
    let candidates = (server, port).to_socket_addrs().map_err(|e| LookupError::Connect {
        server: address.to_string(),
        source: e,
    })?;

    let mut last_error = None;
    for candidate in candidates {
        match TcpStream::connect_timeout(&candidate, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_error = Some(e),
        }
    }

    Err(match last_error {
        Some(e) if e.kind() == io::ErrorKind::TimedOut => LookupError::ConnectTimeout {
            server: address.to_string(),
        },
        Some(e) => LookupError::Connect {
            server: address.to_string(),
            source: e,
        },
        None => LookupError::Connect {
            server: address.to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "host resolved to no addresses"),
        },
    })
}
