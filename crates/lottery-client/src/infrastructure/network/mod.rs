//! Network infrastructure for the client application.
//!
//! [`FrameTransport`] wraps one byte stream and moves whole frames across it.
//! A single `read` or `write` on a socket may transfer fewer bytes than asked
//! for, so both directions loop until the exact byte count is done.
//!
//! ```text
//! receive:  read 2 bytes -> L = u16 BE    read L - 2 bytes -> payload
//! send:     write every byte of the frame, then flush
//! ```
//!
//! Nothing is buffered between calls; the next `receive_frame` starts on the
//! first byte of the next frame.

pub mod mock;

use async_trait::async_trait;
use lottery_core::protocol::{codec::payload_len, messages::LENGTH_FIELD_SIZE};
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    net::TcpStream,
};
use tracing::{debug, trace};

use crate::application::frame_channel::{FrameChannel, FrameError, TransportError};

/// Connects to the server over TCP.
///
/// # Errors
///
/// Returns [`TransportError::ConnectFailed`] if the address cannot be
/// resolved or the connection is refused.
pub async fn connect(addr: &str) -> Result<FrameTransport<TcpStream>, TransportError> {
    let stream = TcpStream::connect(addr)
        .await
        .map_err(|source| TransportError::ConnectFailed {
            addr: addr.to_string(),
            source,
        })?;
    // Frames are small and each one waits for a reply.
    stream.set_nodelay(true)?;
    debug!("connected to server at {addr}");
    Ok(FrameTransport::new(stream))
}

/// Frame-level adapter over a byte stream.
pub struct FrameTransport<S> {
    stream: S,
}

impl<S> FrameTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wraps an already-connected stream.
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    /// Fills `buf` completely, reissuing reads after short ones.
    ///
    /// `read_exact` would do the same but reports an early EOF as a bare
    /// `UnexpectedEof`; this loop keeps how many bytes had arrived so
    /// [`TransportError::ConnectionClosed`] can carry it.
    async fn read_full(&mut self, buf: &mut [u8]) -> Result<(), TransportError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.stream.read(&mut buf[filled..]).await {
                Ok(0) => {
                    return Err(TransportError::ConnectionClosed {
                        expected: buf.len(),
                        received: filled,
                    })
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<S> FrameChannel for FrameTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn send_frame(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        self.stream.write_all(frame).await?;
        self.stream.flush().await?;
        trace!("sent frame of {} bytes", frame.len());
        Ok(())
    }

    async fn receive_frame(&mut self) -> Result<Vec<u8>, FrameError> {
        let mut header = [0u8; LENGTH_FIELD_SIZE];
        self.read_full(&mut header).await?;
        let len = payload_len(header)?;

        let mut payload = vec![0u8; len];
        self.read_full(&mut payload).await?;
        trace!("received frame of {} bytes", LENGTH_FIELD_SIZE + len);
        Ok(payload)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use lottery_core::{encode_confirmation, encode_winners, ProtocolError};
    use tokio::io::duplex;
    use tokio_test::io::Builder;

    #[tokio::test]
    async fn test_receive_frame_returns_payload_without_length_field() {
        // Arrange
        let frame = encode_winners(&[1, 2]).unwrap();
        let mock = Builder::new().read(&frame).build();
        let mut transport = FrameTransport::new(mock);

        // Act
        let payload = transport.receive_frame().await.unwrap();

        // Assert
        assert_eq!(payload, frame[2..].to_vec());
    }

    #[tokio::test]
    async fn test_receive_frame_reassembles_byte_at_a_time_reads() {
        // Arrange: the confirmation trickles in one byte per read
        let mock = Builder::new()
            .read(&[0x00])
            .read(&[0x04])
            .read(&[0x02])
            .read(&[0x00])
            .build();
        let mut transport = FrameTransport::new(mock);

        // Act
        let payload = transport.receive_frame().await.unwrap();

        // Assert
        assert_eq!(payload, vec![0x02, 0x00]);
    }

    #[tokio::test]
    async fn test_receive_frame_handles_header_split_from_body() {
        let frame = encode_winners(&[10, 20, 30]).unwrap();
        let mock = Builder::new()
            .read(&frame[..1])
            .read(&frame[1..5])
            .read(&frame[5..])
            .build();
        let mut transport = FrameTransport::new(mock);

        assert_eq!(transport.receive_frame().await.unwrap(), frame[2..].to_vec());
    }

    #[tokio::test]
    async fn test_receive_frame_reads_consecutive_frames_without_overrun() {
        // Arrange: two frames delivered in a single read
        let mut bytes = encode_confirmation(true);
        bytes.extend(encode_confirmation(false));
        let mock = Builder::new().read(&bytes).build();
        let mut transport = FrameTransport::new(mock);

        // Act
        let first = transport.receive_frame().await.unwrap();
        let second = transport.receive_frame().await.unwrap();

        // Assert
        assert_eq!(first, vec![0x02, 0x00]);
        assert_eq!(second, vec![0x02, 0x01]);
    }

    #[tokio::test]
    async fn test_receive_frame_with_length_two_returns_empty_payload() {
        let mock = Builder::new().read(&[0x00, 0x02]).build();
        let mut transport = FrameTransport::new(mock);

        assert!(transport.receive_frame().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_receive_frame_rejects_length_below_two() {
        // Arrange
        let mock = Builder::new().read(&[0x00, 0x01]).build();
        let mut transport = FrameTransport::new(mock);

        // Act
        let err = transport.receive_frame().await.unwrap_err();

        // Assert
        assert!(matches!(
            err,
            FrameError::Protocol(ProtocolError::InvalidLengthField(1))
        ));
    }

    #[tokio::test]
    async fn test_receive_frame_eof_inside_header_is_connection_closed() {
        // Arrange
        let (client, mut server) = duplex(64);
        server.write_all(&[0x00]).await.unwrap();
        drop(server);
        let mut transport = FrameTransport::new(client);

        // Act
        let err = transport.receive_frame().await.unwrap_err();

        // Assert
        assert!(matches!(
            err,
            FrameError::Transport(TransportError::ConnectionClosed {
                expected: 2,
                received: 1
            })
        ));
    }

    #[tokio::test]
    async fn test_receive_frame_eof_inside_body_is_connection_closed() {
        let (client, mut server) = duplex(64);
        server.write_all(&[0x00, 0x0A, 0x05, 0x02, 0x00]).await.unwrap();
        drop(server);
        let mut transport = FrameTransport::new(client);

        let err = transport.receive_frame().await.unwrap_err();

        assert!(matches!(
            err,
            FrameError::Transport(TransportError::ConnectionClosed {
                expected: 8,
                received: 3
            })
        ));
    }

    #[tokio::test]
    async fn test_receive_frame_on_closed_stream_reports_zero_received() {
        let (client, server) = duplex(64);
        drop(server);
        let mut transport = FrameTransport::new(client);

        let err = transport.receive_frame().await.unwrap_err();

        assert!(matches!(
            err,
            FrameError::Transport(TransportError::ConnectionClosed {
                expected: 2,
                received: 0
            })
        ));
    }

    #[tokio::test]
    async fn test_send_frame_completes_across_short_writes() {
        // Arrange: the peer accepts the frame in three pieces
        let frame = encode_winners(&[5, 6, 7]).unwrap();
        let mock = Builder::new()
            .write(&frame[..3])
            .write(&frame[3..7])
            .write(&frame[7..])
            .build();
        let mut transport = FrameTransport::new(mock);

        // Act / Assert: the mock panics if any byte is missing or extra
        transport.send_frame(&frame).await.unwrap();
    }

    #[tokio::test]
    async fn test_send_frame_write_failure_is_io_error() {
        let mock = Builder::new()
            .write_error(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "peer gone",
            ))
            .build();
        let mut transport = FrameTransport::new(mock);

        let err = transport.send_frame(&[0x00, 0x04, 0x03, 0x01]).await.unwrap_err();

        assert!(matches!(err, TransportError::Io(e) if e.kind() == std::io::ErrorKind::BrokenPipe));
    }

    #[tokio::test]
    async fn test_read_error_is_io_error() {
        let mock = Builder::new()
            .read(&[0x00])
            .read_error(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "reset",
            ))
            .build();
        let mut transport = FrameTransport::new(mock);

        let err = transport.receive_frame().await.unwrap_err();

        assert!(matches!(err, FrameError::Transport(TransportError::Io(_))));
    }

    #[tokio::test]
    async fn test_connect_to_closed_port_is_connect_failed() {
        // Arrange: bind then drop a listener so the port is known to be free
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        // Act
        let result = connect(&addr).await;

        // Assert
        assert!(matches!(result, Err(TransportError::ConnectFailed { .. })));
    }
}
