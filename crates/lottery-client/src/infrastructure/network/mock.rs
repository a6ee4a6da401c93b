//! Scripted in-memory frame channel for unit testing.
//!
//! # Why a scripted channel?
//!
//! The submit use case only cares about *which* frames it sends and *which*
//! replies it gets back.  `ScriptedChannel` records every sent frame and
//! answers `receive_frame` from a queue of pre-encoded server frames, so
//! tests can assert the exact conversation without opening a socket.
//!
//! # Usage in tests
//!
//! ```ignore
//! let mut channel = ScriptedChannel::new();
//! channel.push_reply(encode_confirmation(true));
//! channel.push_reply(encode_winners(&[42]).unwrap());
//!
//! use_case.run(&mut channel, records, &cancel).await?;
//!
//! assert_eq!(channel.sent_frames().len(), 3);
//! ```
//!
//! When the reply queue is empty, `receive_frame` behaves like a peer that
//! closed the connection.

use std::collections::VecDeque;

use async_trait::async_trait;
use lottery_core::protocol::{codec::payload_len, messages::LENGTH_FIELD_SIZE};

use crate::application::frame_channel::{FrameChannel, FrameError, TransportError};

/// A channel that replays queued replies and records sent frames.
#[derive(Debug, Default)]
pub struct ScriptedChannel {
    sent: Vec<Vec<u8>>,
    replies: VecDeque<Vec<u8>>,
    fail_sends: bool,
}

impl ScriptedChannel {
    /// Creates a channel with no queued replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a complete server frame, length field included.
    pub fn push_reply(&mut self, frame: Vec<u8>) {
        self.replies.push_back(frame);
    }

    /// Makes every later `send_frame` fail with a broken-pipe error.
    pub fn fail_sends(&mut self) {
        self.fail_sends = true;
    }

    /// Frames sent so far, in order.
    pub fn sent_frames(&self) -> &[Vec<u8>] {
        &self.sent
    }

    /// Number of queued replies not yet consumed.
    pub fn pending_replies(&self) -> usize {
        self.replies.len()
    }
}

#[async_trait]
impl FrameChannel for ScriptedChannel {
    async fn send_frame(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        if self.fail_sends {
            return Err(TransportError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "scripted send failure",
            )));
        }
        self.sent.push(frame.to_vec());
        Ok(())
    }

    async fn receive_frame(&mut self) -> Result<Vec<u8>, FrameError> {
        let frame = self
            .replies
            .pop_front()
            .ok_or(TransportError::ConnectionClosed {
                expected: LENGTH_FIELD_SIZE,
                received: 0,
            })?;
        if frame.len() < LENGTH_FIELD_SIZE {
            return Err(TransportError::ConnectionClosed {
                expected: LENGTH_FIELD_SIZE,
                received: frame.len(),
            }
            .into());
        }
        let len = payload_len([frame[0], frame[1]])?;
        let available = frame.len() - LENGTH_FIELD_SIZE;
        if available < len {
            return Err(TransportError::ConnectionClosed {
                expected: len,
                received: available,
            }
            .into());
        }
        Ok(frame[LENGTH_FIELD_SIZE..LENGTH_FIELD_SIZE + len].to_vec())
    }
}
