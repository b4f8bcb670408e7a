//! Cooperatively-suspending transport
//!
//! One WHOIS round trip over tokio: connect, write the statement line,
//! read until the peer closes. Every connect/read/write operation carries
//! its own timeout; nothing bounds the round trip as a whole.

use std::io;
use std::time::{Duration, Instant};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, warn};

use crate::config::{MAX_RESPONSE_BYTES, READ_PACING_MS};
use crate::core::ResponseEncoding;
use crate::error::LookupError;

/// Send `statement` to `server:port` and return the decoded response.
///
/// Connect and write failures are hard transport errors. Once the first
/// byte has been read, failures and timeouts stop the read and keep
/// whatever was accumulated - partial data beats none.
pub async fn fetch(
    server: &str,
    port: u16,
    statement: &str,
    encoding: ResponseEncoding,
    timeout: Duration,
) -> Result<String, LookupError> {
    let address = format!("{}:{}", server, port);
    debug!("connecting to WHOIS server {}", address);

    let mut stream = match tokio::time::timeout(timeout, TcpStream::connect(&address)).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => {
            return Err(LookupError::Connect {
                server: address,
                source: e,
            });
        }
        Err(_) => return Err(LookupError::ConnectTimeout { server: address }),
    };

    if let Err(e) = stream.set_nodelay(true) {
        warn!("Failed to set TCP_NODELAY: {}", e);
    }

    // WHOIS protocol expects a CRLF-terminated query line
    let line = format!("{}\r\n", statement);
    match tokio::time::timeout(timeout, stream.write_all(line.as_bytes())).await {
        Ok(Ok(())) => {
            if let Err(e) = stream.flush().await {
                return Err(LookupError::Write {
                    server: address,
                    source: e,
                });
            }
        }
        Ok(Err(e)) => {
            return Err(LookupError::Write {
                server: address,
                source: e,
            });
        }
        Err(_) => {
            return Err(LookupError::Write {
                server: address,
                source: io::Error::new(io::ErrorKind::TimedOut, "query write timed out"),
            });
        }
    }

    let mut collected: Vec<u8> = Vec::new();
    let mut buffer = [0u8; 8192];
    let read_start = Instant::now();

    loop {
        match tokio::time::timeout(timeout, stream.read(&mut buffer)).await {
            Ok(Ok(0)) => {
                // A zero-byte read only ends the response once something has
                // been accumulated; before that, the read window is bounded
                // by the timeout alone.
                if !collected.is_empty() || read_start.elapsed() >= timeout {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(READ_PACING_MS)).await;
            }
            Ok(Ok(n)) => {
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
            Ok(Err(e)) => {
                debug!("read failed after {} bytes, keeping partial response: {}", collected.len(), e);
                break;
            }
            Err(_) => {
                debug!("timeout reading response after {} bytes", collected.len());
                break;
            }
        }
    }

    debug!("received {} bytes from {}", collected.len(), address);
    Ok(encoding.decode(&collected))
}
