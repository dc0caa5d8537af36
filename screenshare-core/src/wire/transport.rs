//! Short-lived TCP connections carrying one wire message each.
//!
//! The sender opens a connection, writes `[length][payload]`, and closes.
//! The receiver accepts one connection at a time and reads exactly one
//! message from it. Both sides bound every step with a timeout so a dead
//! peer never stalls the loop for longer than that.

use std::net::SocketAddr;
use std::time::Duration;

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::debug;

use crate::error::ShareError;
use crate::wire::codec::{DEFAULT_MAX_PAYLOAD, LENGTH_PREFIX_SIZE, WireCodec};

/// Default per-frame send budget (connect + write + close).
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_millis(200);

/// Send one message to `addr` on a fresh connection.
///
/// The whole exchange shares a single `timeout`. On expiry the
/// connection is dropped and [`ShareError::Timeout`] is returned; the
/// caller is expected to abandon the frame.
pub async fn send_message(
    addr: SocketAddr,
    payload: &[u8],
    timeout: Duration,
) -> Result<(), ShareError> {
    let exchange = async {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;

        let mut framed = FramedWrite::new(stream, WireCodec::new());
        framed.send(payload).await?;

        let mut stream = framed.into_inner();
        stream.shutdown().await?;
        Ok::<(), ShareError>(())
    };

    tokio::time::timeout(timeout, exchange)
        .await
        .map_err(|_| ShareError::Timeout(timeout))?
}

/// Read exactly one message from `reader`.
///
/// Partial reads are accumulated until the declared length is reached.
/// If the stream ends first the result is [`ShareError::ConnectionClosed`].
pub async fn read_message<R>(reader: R, max_payload: usize) -> Result<Bytes, ShareError>
where
    R: AsyncRead + Unpin,
{
    let mut framed = FramedRead::new(reader, WireCodec::with_max_payload(max_payload));
    match framed.next().await {
        Some(result) => result,
        None => Err(ShareError::ConnectionClosed {
            expected: LENGTH_PREFIX_SIZE,
            received: 0,
        }),
    }
}

// ── FrameListener ────────────────────────────────────────────────

/// Timeouts and limits for [`FrameListener`].
#[derive(Debug, Clone, Copy)]
pub struct ListenerConfig {
    /// How long one `accept` may wait for a sender.
    pub accept_timeout: Duration,
    /// How long reading one message from an accepted connection may take.
    pub read_timeout: Duration,
    /// Largest declared payload length accepted.
    pub max_payload: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            accept_timeout: Duration::from_secs(1),
            read_timeout: Duration::from_secs(1),
            max_payload: DEFAULT_MAX_PAYLOAD,
        }
    }
}

/// Receiver-side listener that yields one message per accepted connection.
pub struct FrameListener {
    listener: TcpListener,
    config: ListenerConfig,
}

impl FrameListener {
    /// Bind a listener on `addr`.
    pub async fn bind(addr: SocketAddr, config: ListenerConfig) -> Result<Self, ShareError> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener, config })
    }

    /// Wrap an already-bound listener.
    pub fn from_listener(listener: TcpListener, config: ListenerConfig) -> Self {
        Self { listener, config }
    }

    /// The address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ShareError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept one connection and read one message from it.
    ///
    /// Returns [`ShareError::Timeout`] when no sender connects within
    /// `accept_timeout` or the message does not complete within
    /// `read_timeout`. The connection is closed before returning.
    pub async fn accept_message(&self) -> Result<(Bytes, SocketAddr), ShareError> {
        let accept_timeout = self.config.accept_timeout;
        let (stream, peer) = tokio::time::timeout(accept_timeout, self.listener.accept())
            .await
            .map_err(|_| ShareError::Timeout(accept_timeout))??;

        let read_timeout = self.config.read_timeout;
        let payload = tokio::time::timeout(
            read_timeout,
            read_message(stream, self.config.max_payload),
        )
        .await
        .map_err(|_| ShareError::Timeout(read_timeout))??;

        debug!("received {} bytes from {peer}", payload.len());
        Ok((payload, peer))
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::codec::encode_message;

    async fn ephemeral_listener(config: ListenerConfig) -> (FrameListener, SocketAddr) {
        let listener = FrameListener::bind("127.0.0.1:0".parse().unwrap(), config)
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        (listener, addr)
    }

    #[tokio::test]
    async fn read_accumulates_partial_reads() {
        let msg = encode_message(b"partial reads are stitched").unwrap();
        let reader = tokio_test::io::Builder::new()
            .read(&msg[..1])
            .read(&msg[1..4])
            .read(&msg[4..9])
            .read(&msg[9..])
            .build();

        let payload = read_message(reader, DEFAULT_MAX_PAYLOAD).await.unwrap();
        assert_eq!(payload.as_ref(), b"partial reads are stitched");
    }

    #[tokio::test]
    async fn read_reports_peer_closing_mid_payload() {
        let msg = encode_message(&[9u8; 100]).unwrap();
        let reader = tokio_test::io::Builder::new().read(&msg[..50]).build();

        let err = read_message(reader, DEFAULT_MAX_PAYLOAD).await.unwrap_err();
        assert!(matches!(
            err,
            ShareError::ConnectionClosed {
                expected: 104,
                received: 50
            }
        ));
    }

    #[tokio::test]
    async fn read_reports_empty_connection() {
        let reader = tokio_test::io::Builder::new().build();
        let err = read_message(reader, DEFAULT_MAX_PAYLOAD).await.unwrap_err();
        assert!(matches!(err, ShareError::ConnectionClosed { received: 0, .. }));
    }

    #[tokio::test]
    async fn send_and_accept_over_loopback() {
        let (listener, addr) = ephemeral_listener(ListenerConfig::default()).await;
        let payload: Vec<u8> = (0..200_000u32).map(|i| (i % 256) as u8).collect();

        let sent = payload.clone();
        let sender = tokio::spawn(async move {
            send_message(addr, &sent, Duration::from_secs(2)).await
        });

        let (received, _peer) = listener.accept_message().await.unwrap();
        sender.await.unwrap().unwrap();
        assert_eq!(received.as_ref(), payload.as_slice());
    }

    #[tokio::test]
    async fn zero_length_message_over_loopback() {
        let (listener, addr) = ephemeral_listener(ListenerConfig::default()).await;
        let sender =
            tokio::spawn(async move { send_message(addr, &[], Duration::from_secs(2)).await });

        let (received, _) = listener.accept_message().await.unwrap();
        sender.await.unwrap().unwrap();
        assert!(received.is_empty());
    }

    #[tokio::test]
    async fn accept_times_out_without_sender() {
        let config = ListenerConfig {
            accept_timeout: Duration::from_millis(50),
            ..ListenerConfig::default()
        };
        let (listener, _) = ephemeral_listener(config).await;
        let err = listener.accept_message().await.unwrap_err();
        assert!(matches!(err, ShareError::Timeout(_)));
    }

    #[tokio::test]
    async fn send_to_closed_port_is_transport_error() {
        // Bind then drop to obtain a port with nothing listening.
        let addr = {
            let l = TcpListener::bind("127.0.0.1:0").await.unwrap();
            l.local_addr().unwrap()
        };
        let err = send_message(addr, b"lost", Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn sender_closing_early_is_framing_error() {
        let (listener, addr) = ephemeral_listener(ListenerConfig::default()).await;

        let writer = tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            stream.write_all(&64u32.to_ne_bytes()).await.unwrap();
            stream.write_all(&[0u8; 10]).await.unwrap();
            stream.shutdown().await.unwrap();
        });

        let err = listener.accept_message().await.unwrap_err();
        writer.await.unwrap();
        assert!(matches!(err, ShareError::ConnectionClosed { .. }));
    }
}
