//! Binary codec for encoding and decoding lottery protocol messages.
//!
//! Wire format:
//! ```text
//! [total_length:2][msg_type:1][body:N]      total_length = 2 + 1 + N
//! ```
//! All multi-byte integers are big-endian.  Text fields carry a 1-byte length
//! prefix counting UTF-8 bytes.
//!
//! Body layouts:
//! ```text
//! BET_BATCH    (0x01): [count:1][bet]*count
//! CONFIRMATION (0x02): [status:1]              0x00 = success
//! FINALIZATION (0x03): [agency:1]
//! WINNER_QUERY (0x04): [agency:1]
//! WINNERS      (0x05): [count:1][document:4]*count
//!
//! bet: [agency:1][first_len:1][first][last_len:1][last][document:4][birthdate:10][number:2]
//! ```
//!
//! Encoders return whole frames, length field included.  Decoders take the
//! *payload* of a frame (type tag + body), which is exactly what the stream
//! transport hands back after consuming the length field.

use thiserror::Error;

use crate::domain::bet::{Bet, BIRTHDATE_LEN};
use crate::protocol::messages::{
    Message, MessageType, LENGTH_FIELD_SIZE, MAX_COUNT, MAX_FRAME_LEN, STATUS_FAILURE,
    STATUS_SUCCESS,
};

/// Errors raised when caller-supplied data cannot be represented on the wire.
///
/// These are always detected before any byte is sent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodingError {
    /// A length-prefixed text field does not fit its 1-byte length prefix.
    #[error("field too long: {field} is {len} bytes, maximum is 255")]
    FieldTooLong { field: &'static str, len: usize },

    /// The birth date is not exactly 10 bytes.
    #[error("invalid birth date: expected 10 bytes, got {len}")]
    InvalidBirthDate { len: usize },

    /// A 1-byte count field would overflow.
    #[error("count field overflow: {count} entries, maximum is 255")]
    CountOverflow { count: usize },

    /// The frame would not fit the 16-bit total length field.
    #[error("frame too large: {len} bytes, maximum is 65535")]
    FrameTooLarge { len: usize },
}

/// Errors raised when received bytes do not form a valid message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The payload is shorter than the message type requires.
    #[error("message too short: expected {expected} bytes, got {actual}")]
    MessageTooShort { expected: usize, actual: usize },

    /// The payload carries a different type tag than the caller expected.
    #[error("unexpected message type: expected 0x{expected:02X}, got 0x{actual:02X}")]
    UnexpectedMessageType { expected: u8, actual: u8 },

    /// The type tag is not defined by the protocol.
    #[error("unknown message type: 0x{0:02X}")]
    UnknownMessageType(u8),

    /// The payload length disagrees with what its own fields declare.
    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// The frame length field is smaller than the length field itself.
    #[error("invalid length field: {0} does not cover the 2-byte length field")]
    InvalidLengthField(u16),

    /// A field value could not be parsed (invalid UTF-8, etc.).
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

// ── Public encoders ───────────────────────────────────────────────────────────

/// Encodes one bet into its in-batch byte layout.
///
/// # Errors
///
/// Returns [`EncodingError::FieldTooLong`] if either name exceeds 255 bytes and
/// [`EncodingError::InvalidBirthDate`] if the birth date is not 10 bytes.
///
/// # Examples
///
/// ```rust
/// use lottery_core::{encode_record, Bet};
///
/// let bet = Bet {
///     agency: 1,
///     first_name: "Ana".into(),
///     last_name: "Ruiz".into(),
///     document: 1,
///     birthdate: "2000-01-31".into(),
///     number: 2,
/// };
/// let bytes = encode_record(&bet).unwrap();
/// assert_eq!(bytes.len(), bet.encoded_len());
/// assert_eq!(&bytes[..2], &[1, 3]);
/// ```
pub fn encode_record(bet: &Bet) -> Result<Vec<u8>, EncodingError> {
    let mut buf = Vec::with_capacity(bet.encoded_len());
    encode_record_into(&mut buf, bet)?;
    Ok(buf)
}

/// Wraps already-encoded bets into a complete bet-batch frame.
///
/// `records` is the concatenation of [`encode_record`] outputs and `count`
/// the number of bets it holds.
///
/// # Errors
///
/// Returns [`EncodingError::CountOverflow`] if `count > 255` and
/// [`EncodingError::FrameTooLarge`] if the frame exceeds 65535 bytes.
pub fn encode_batch(records: &[u8], count: usize) -> Result<Vec<u8>, EncodingError> {
    if count > MAX_COUNT {
        return Err(EncodingError::CountOverflow { count });
    }
    let mut body = Vec::with_capacity(1 + records.len());
    body.push(count as u8);
    body.extend_from_slice(records);
    write_frame(MessageType::BetBatch, &body)
}

/// Encodes the "no more bets from this agency" notice.
pub fn encode_finalization(agency: u8) -> Vec<u8> {
    short_frame(MessageType::Finalization, agency)
}

/// Encodes a request for the winners list of `agency`.
pub fn encode_winner_query(agency: u8) -> Vec<u8> {
    short_frame(MessageType::WinnerQuery, agency)
}

/// Encodes a batch confirmation as the server sends it.
pub fn encode_confirmation(success: bool) -> Vec<u8> {
    short_frame(
        MessageType::Confirmation,
        if success { STATUS_SUCCESS } else { STATUS_FAILURE },
    )
}

/// Encodes a winners list as the server sends it.
///
/// # Errors
///
/// Returns [`EncodingError::CountOverflow`] for more than 255 documents.
pub fn encode_winners(documents: &[u32]) -> Result<Vec<u8>, EncodingError> {
    if documents.len() > MAX_COUNT {
        return Err(EncodingError::CountOverflow {
            count: documents.len(),
        });
    }
    let mut body = Vec::with_capacity(1 + 4 * documents.len());
    body.push(documents.len() as u8);
    for document in documents {
        body.extend_from_slice(&document.to_be_bytes());
    }
    write_frame(MessageType::Winners, &body)
}

/// Encodes any [`Message`] into a complete frame.
///
/// # Errors
///
/// Propagates the [`EncodingError`] of the variant-specific encoder.
///
/// # Examples
///
/// ```rust
/// use lottery_core::{decode_message, encode_message, Message};
///
/// let msg = Message::Winners(vec![30_904_465, 12]);
/// let frame = encode_message(&msg).unwrap();
/// // The transport strips the 2-byte length field before decoding.
/// assert_eq!(decode_message(&frame[2..]).unwrap(), msg);
/// ```
pub fn encode_message(msg: &Message) -> Result<Vec<u8>, EncodingError> {
    match msg {
        Message::BetBatch(bets) => {
            let mut records = Vec::new();
            for bet in bets {
                encode_record_into(&mut records, bet)?;
            }
            encode_batch(&records, bets.len())
        }
        Message::Confirmation { status } => Ok(short_frame(MessageType::Confirmation, *status)),
        Message::Finalization { agency } => Ok(encode_finalization(*agency)),
        Message::WinnerQuery { agency } => Ok(encode_winner_query(*agency)),
        Message::Winners(documents) => encode_winners(documents),
    }
}

// ── Public decoders ───────────────────────────────────────────────────────────

/// Decodes a confirmation payload; returns `true` only for status `0x00`.
///
/// A failure status is valid protocol data, not an error.
///
/// # Errors
///
/// Returns [`ProtocolError`] when the payload is not exactly two bytes or the
/// tag is not `0x02`.
///
/// # Examples
///
/// ```rust
/// use lottery_core::decode_confirmation;
///
/// assert_eq!(decode_confirmation(&[0x02, 0x00]), Ok(true));
/// assert_eq!(decode_confirmation(&[0x02, 0x01]), Ok(false));
/// assert!(decode_confirmation(&[0x02]).is_err());
/// ```
pub fn decode_confirmation(payload: &[u8]) -> Result<bool, ProtocolError> {
    decode_short(payload, MessageType::Confirmation).map(|status| status == STATUS_SUCCESS)
}

/// Decodes a winners-list payload into document numbers, in wire order.
///
/// # Errors
///
/// Returns [`ProtocolError`] when the payload is shorter than two bytes, the
/// tag is not `0x05`, or the length is not exactly `2 + 4 * count`.
pub fn decode_winners(payload: &[u8]) -> Result<Vec<u32>, ProtocolError> {
    require_len(payload, 2)?;
    expect_tag(payload, MessageType::Winners)?;
    let count = payload[1] as usize;
    let expected = 2 + 4 * count;
    if payload.len() != expected {
        return Err(ProtocolError::LengthMismatch {
            expected,
            actual: payload.len(),
        });
    }
    let mut documents = Vec::with_capacity(count);
    let mut off = 2;
    for _ in 0..count {
        documents.push(read_u32(payload, off)?);
        off += 4;
    }
    Ok(documents)
}

/// Decodes a bet-batch payload back into bets.
///
/// # Errors
///
/// Returns [`ProtocolError`] if a bet is truncated, a name is not UTF-8, or
/// bytes remain after the declared number of bets.
pub fn decode_bet_batch(payload: &[u8]) -> Result<Vec<Bet>, ProtocolError> {
    require_len(payload, 2)?;
    expect_tag(payload, MessageType::BetBatch)?;
    let count = payload[1] as usize;
    let mut bets = Vec::with_capacity(count);
    let mut off = 2;
    for _ in 0..count {
        let (bet, next) = decode_record(payload, off)?;
        bets.push(bet);
        off = next;
    }
    if off != payload.len() {
        return Err(ProtocolError::LengthMismatch {
            expected: off,
            actual: payload.len(),
        });
    }
    Ok(bets)
}

/// Decodes any payload by dispatching on its type tag.
///
/// # Errors
///
/// Returns [`ProtocolError::UnknownMessageType`] for an unrecognised tag, or
/// the error of the variant-specific decoder.
pub fn decode_message(payload: &[u8]) -> Result<Message, ProtocolError> {
    require_len(payload, 1)?;
    let tag = payload[0];
    let msg_type = MessageType::try_from(tag).map_err(|_| ProtocolError::UnknownMessageType(tag))?;

    match msg_type {
        MessageType::BetBatch => decode_bet_batch(payload).map(Message::BetBatch),
        MessageType::Confirmation => {
            decode_short(payload, msg_type).map(|status| Message::Confirmation { status })
        }
        MessageType::Finalization => {
            decode_short(payload, msg_type).map(|agency| Message::Finalization { agency })
        }
        MessageType::WinnerQuery => {
            decode_short(payload, msg_type).map(|agency| Message::WinnerQuery { agency })
        }
        MessageType::Winners => decode_winners(payload).map(Message::Winners),
    }
}

/// Reads the `total_length` field of a frame header and returns the payload
/// length that follows it.
///
/// # Errors
///
/// Returns [`ProtocolError::InvalidLengthField`] when the declared total is
/// smaller than the length field itself.
pub fn payload_len(header: [u8; LENGTH_FIELD_SIZE]) -> Result<usize, ProtocolError> {
    let total = u16::from_be_bytes(header);
    (total as usize)
        .checked_sub(LENGTH_FIELD_SIZE)
        .ok_or(ProtocolError::InvalidLengthField(total))
}

// ── Per-message helpers ───────────────────────────────────────────────────────

fn encode_record_into(buf: &mut Vec<u8>, bet: &Bet) -> Result<(), EncodingError> {
    if bet.birthdate.len() != BIRTHDATE_LEN {
        return Err(EncodingError::InvalidBirthDate {
            len: bet.birthdate.len(),
        });
    }
    buf.push(bet.agency);
    write_length_prefixed_string(buf, "first_name", &bet.first_name)?;
    write_length_prefixed_string(buf, "last_name", &bet.last_name)?;
    buf.extend_from_slice(&bet.document.to_be_bytes());
    buf.extend_from_slice(bet.birthdate.as_bytes());
    buf.extend_from_slice(&bet.number.to_be_bytes());
    Ok(())
}

/// Decodes one bet starting at `offset`; returns it with the offset after it.
fn decode_record(p: &[u8], offset: usize) -> Result<(Bet, usize), ProtocolError> {
    require_len(p, offset + 1)?;
    let agency = p[offset];
    let (first_name, off) = read_length_prefixed_string(p, offset + 1)?;
    let (last_name, off) = read_length_prefixed_string(p, off)?;
    let document = read_u32(p, off)?;
    let off = off + 4;
    require_len(p, off + BIRTHDATE_LEN)?;
    let birthdate = std::str::from_utf8(&p[off..off + BIRTHDATE_LEN])
        .map_err(|e| ProtocolError::MalformedPayload(format!("invalid birth date: {e}")))?
        .to_string();
    let off = off + BIRTHDATE_LEN;
    require_len(p, off + 2)?;
    let number = u16::from_be_bytes([p[off], p[off + 1]]);
    Ok((
        Bet {
            agency,
            first_name,
            last_name,
            document,
            birthdate,
            number,
        },
        off + 2,
    ))
}

/// Builds `[total_length][tag][value]`, the layout shared by four of the five
/// message types.
fn short_frame(tag: MessageType, value: u8) -> Vec<u8> {
    let total = (LENGTH_FIELD_SIZE + 2) as u16;
    let mut buf = Vec::with_capacity(total as usize);
    buf.extend_from_slice(&total.to_be_bytes());
    buf.push(tag as u8);
    buf.push(value);
    buf
}

/// Decodes a `[tag][value]` payload, checking length before tag.
fn decode_short(payload: &[u8], tag: MessageType) -> Result<u8, ProtocolError> {
    if payload.len() < 2 {
        return Err(ProtocolError::MessageTooShort {
            expected: 2,
            actual: payload.len(),
        });
    }
    if payload.len() != 2 {
        return Err(ProtocolError::LengthMismatch {
            expected: 2,
            actual: payload.len(),
        });
    }
    expect_tag(payload, tag)?;
    Ok(payload[1])
}

fn write_frame(tag: MessageType, body: &[u8]) -> Result<Vec<u8>, EncodingError> {
    let total = LENGTH_FIELD_SIZE + 1 + body.len();
    if total > MAX_FRAME_LEN {
        return Err(EncodingError::FrameTooLarge { len: total });
    }
    let mut buf = Vec::with_capacity(total);
    buf.extend_from_slice(&(total as u16).to_be_bytes());
    buf.push(tag as u8);
    buf.extend_from_slice(body);
    debug_assert_eq!(buf.len(), total);
    Ok(buf)
}

// ── Utility helpers ───────────────────────────────────────────────────────────

fn require_len(buf: &[u8], needed: usize) -> Result<(), ProtocolError> {
    if buf.len() < needed {
        Err(ProtocolError::MessageTooShort {
            expected: needed,
            actual: buf.len(),
        })
    } else {
        Ok(())
    }
}

fn expect_tag(payload: &[u8], tag: MessageType) -> Result<(), ProtocolError> {
    if payload[0] != tag as u8 {
        return Err(ProtocolError::UnexpectedMessageType {
            expected: tag as u8,
            actual: payload[0],
        });
    }
    Ok(())
}

fn read_u32(buf: &[u8], offset: usize) -> Result<u32, ProtocolError> {
    require_len(buf, offset + 4)?;
    Ok(u32::from_be_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ]))
}

/// Writes a 1-byte length prefix followed by the UTF-8 string bytes.
fn write_length_prefixed_string(
    buf: &mut Vec<u8>,
    field: &'static str,
    s: &str,
) -> Result<(), EncodingError> {
    let bytes = s.as_bytes();
    if bytes.len() > MAX_COUNT {
        return Err(EncodingError::FieldTooLong {
            field,
            len: bytes.len(),
        });
    }
    buf.push(bytes.len() as u8);
    buf.extend_from_slice(bytes);
    Ok(())
}

/// Reads a 1-byte length prefix and then that many UTF-8 bytes.
/// Returns the string and the offset of the byte after the string.
fn read_length_prefixed_string(buf: &[u8], offset: usize) -> Result<(String, usize), ProtocolError> {
    require_len(buf, offset + 1)?;
    let len = buf[offset] as usize;
    let start = offset + 1;
    require_len(buf, start + len)?;
    let s = std::str::from_utf8(&buf[start..start + len])
        .map_err(|e| ProtocolError::MalformedPayload(format!("invalid UTF-8: {e}")))?
        .to_string();
    Ok((s, start + len))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
