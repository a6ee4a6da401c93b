//! FrameChannel: the port the use case sends and receives frames through.

use async_trait::async_trait;
use lottery_core::ProtocolError;
use thiserror::Error;

/// Failures of the underlying stream.  The connection must not be reused
/// after any of these.
#[derive(Debug, Error)]
pub enum TransportError {
    /// TCP connection to the server failed.
    #[error("failed to connect to server at {addr}: {source}")]
    ConnectFailed {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    /// An I/O error occurred on the established connection.
    #[error("connection I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The peer closed the connection before a frame was complete.
    #[error("connection closed after {received} of {expected} bytes")]
    ConnectionClosed { expected: usize, received: usize },
}

/// Errors raised while receiving a frame.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The length field of the incoming frame is invalid.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Sends and receives whole frames over one connection.
///
/// Implementations must either move the exact number of bytes or fail;
/// partial results are never returned.
#[async_trait]
pub trait FrameChannel: Send {
    /// Writes the complete frame, length field included.
    async fn send_frame(&mut self, frame: &[u8]) -> Result<(), TransportError>;

    /// Reads one frame and returns its payload (type tag + body), without the
    /// 2-byte length field.
    async fn receive_frame(&mut self) -> Result<Vec<u8>, FrameError>;
}
