//! All lottery protocol message types.
//!
//! Every frame on the wire starts with a 2-byte big-endian *total* length
//! (which counts the length field itself) followed by a 1-byte type tag.

use crate::domain::bet::Bet;

// ── Protocol constants ────────────────────────────────────────────────────────

/// Size of the big-endian `total_length` field that opens every frame.
pub const LENGTH_FIELD_SIZE: usize = 2;

/// Size of the header of a bet-batch frame: length(2) + tag(1) + count(1).
pub const BATCH_HEADER_SIZE: usize = LENGTH_FIELD_SIZE + 1 + 1;

/// Largest frame the 16-bit length field can describe.
pub const MAX_FRAME_LEN: usize = u16::MAX as usize;

/// Largest number of entries a 1-byte count field can describe.
pub const MAX_COUNT: usize = u8::MAX as usize;

/// Confirmation status byte meaning "batch stored".
pub const STATUS_SUCCESS: u8 = 0x00;

/// Confirmation status byte the server uses for "batch rejected".
pub const STATUS_FAILURE: u8 = 0x01;

// ── Message type codes ────────────────────────────────────────────────────────

/// All message type tags defined by the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    BetBatch = 0x01,
    Confirmation = 0x02,
    Finalization = 0x03,
    WinnerQuery = 0x04,
    Winners = 0x05,
}

impl TryFrom<u8> for MessageType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            0x01 => Ok(MessageType::BetBatch),
            0x02 => Ok(MessageType::Confirmation),
            0x03 => Ok(MessageType::Finalization),
            0x04 => Ok(MessageType::WinnerQuery),
            0x05 => Ok(MessageType::Winners),
            _ => Err(()),
        }
    }
}

// ── Top-level message enum ────────────────────────────────────────────────────

/// A decoded protocol message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// BET_BATCH (0x01): client → server, up to 255 bets.
    BetBatch(Vec<Bet>),
    /// CONFIRMATION (0x02): server → client, reply to a bet batch.
    ///
    /// `status` is kept verbatim; only `0x00` means success.
    Confirmation { status: u8 },
    /// FINALIZATION (0x03): client → server, "no more bets from this agency".
    Finalization { agency: u8 },
    /// WINNER_QUERY (0x04): client → server, asks for the agency's winners.
    WinnerQuery { agency: u8 },
    /// WINNERS (0x05): server → client, document numbers of the winners.
    Winners(Vec<u32>),
}

impl Message {
    /// Returns the [`MessageType`] tag for this message.
    pub fn message_type(&self) -> MessageType {
        match self {
            Message::BetBatch(_) => MessageType::BetBatch,
            Message::Confirmation { .. } => MessageType::Confirmation,
            Message::Finalization { .. } => MessageType::Finalization,
            Message::WinnerQuery { .. } => MessageType::WinnerQuery,
            Message::Winners(_) => MessageType::Winners,
        }
    }

    /// Builds a confirmation carrying the canonical success or failure status.
    pub fn confirmation(success: bool) -> Self {
        Message::Confirmation {
            status: if success { STATUS_SUCCESS } else { STATUS_FAILURE },
        }
    }
}
