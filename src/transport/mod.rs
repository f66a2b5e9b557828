pub mod config;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tracing::{debug, warn};

use crate::error::ClientError;
pub use config::TransportConfig;

/// One command/response exchange at a time over a persistent connection.
///
/// The wire protocol has no correlation identifiers, so callers must not
/// interleave exchanges on one channel; `DeviceClient` serializes access
/// with a mutex held for the duration of each `exchange`.
#[async_trait::async_trait]
pub trait Channel: Send {
    async fn exchange(&mut self, command: &str) -> Result<String, ClientError>;
    async fn disconnect(&mut self);
}

/// Channel over the controller's local Unix socket.
pub struct UnixChannel {
    config: TransportConfig,
    stream: Option<UnixStream>,
}

impl UnixChannel {
    pub fn new(config: TransportConfig) -> Self {
        Self {
            config,
            stream: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    pub async fn connect(&mut self) -> Result<(), ClientError> {
        if self.stream.is_some() {
            return Ok(());
        }
        debug!(path = %self.config.socket_path, "connecting to controller");
        let connect = UnixStream::connect(&self.config.socket_path);
        let stream = tokio::time::timeout(self.config.connect_timeout, connect)
            .await
            .map_err(|_| {
                ClientError::Connection(format!(
                    "timed out connecting to {}",
                    self.config.socket_path
                ))
            })?
            .map_err(|e| {
                ClientError::Connection(format!(
                    "failed to connect to {}: {}",
                    self.config.socket_path, e
                ))
            })?;
        self.stream = Some(stream);
        Ok(())
    }

    /// Best-effort discard of bytes left over from an exchange the caller
    /// abandoned (e.g. after its own timeout). Without this, an orphan
    /// reply would be misattributed to the next command, since the wire
    /// format carries nothing to detect the mismatch.
    fn drain(&mut self) {
        let mut discarded = 0usize;
        let mut closed = false;
        if let Some(stream) = &self.stream {
            let mut scratch = [0u8; 256];
            loop {
                match stream.try_read(&mut scratch) {
                    Ok(0) => {
                        closed = true;
                        break;
                    }
                    Ok(n) => discarded += n,
                    // WouldBlock means the buffer is clean; anything else
                    // is left for the exchange proper to report.
                    Err(_) => break,
                }
            }
        }
        if closed {
            debug!("connection closed by controller while draining");
            self.stream = None;
        }
        if discarded > 0 {
            warn!(bytes = discarded, "discarded stale bytes before exchange");
        }
    }
}

#[async_trait::async_trait]
impl Channel for UnixChannel {
    async fn exchange(&mut self, command: &str) -> Result<String, ClientError> {
        self.connect().await?;
        self.drain();
        // drain() may have detected a closed stream; reconnect once.
        self.connect().await?;

        // The stream is held out of `self` for the exchange; any transport
        // fault drops it so the next call reconnects.
        let mut stream = self
            .stream
            .take()
            .ok_or_else(|| ClientError::Connection("not connected".to_string()))?;

        debug!(%command, "sending command");
        if let Err(e) = stream.write_all(command.as_bytes()).await {
            return Err(ClientError::Connection(format!(
                "failed to send command: {}",
                e
            )));
        }

        let mut buf = vec![0u8; self.config.read_buffer_size];
        let n = match stream.read(&mut buf).await {
            Ok(0) => {
                return Err(ClientError::Connection(
                    "connection closed by controller".to_string(),
                ))
            }
            Ok(n) => n,
            Err(e) => {
                return Err(ClientError::Connection(format!(
                    "failed to read reply: {}",
                    e
                )))
            }
        };
        self.stream = Some(stream);

        let reply = String::from_utf8_lossy(&buf[..n]).trim_end().to_string();
        debug!(%reply, "received reply");

        if reply.starts_with(crate::protocol::ERROR_PREFIX) {
            return Err(ClientError::Protocol(reply));
        }
        Ok(reply)
    }

    async fn disconnect(&mut self) {
        if self.stream.take().is_some() {
            debug!("disconnected from controller");
        }
    }
}
