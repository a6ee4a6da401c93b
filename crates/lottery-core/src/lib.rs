//! # lottery-core
//!
//! Shared library for the lottery agency client containing the bet domain
//! model, the binary wire codec, and the batch builder that packs bets into
//! size-bounded messages.
//!
//! It has zero dependencies on OS APIs, async runtimes, or network sockets;
//! the client crate supplies the stream transport.
//!
//! # Architecture overview (for beginners)
//!
//! Every lottery agency runs one client.  The client reads the bets placed at
//! that agency, ships them to the central server in batches, tells the server
//! it is done, and finally asks which of its bettors won.
//!
//! This crate (`lottery-core`) is the shared foundation.  It defines:
//!
//! - **`domain`** – The [`Bet`] record: who placed it, on which number.
//!
//! - **`protocol`** – How bytes travel over the network.  Every message is a
//!   frame with a 2-byte big-endian total length, a 1-byte type tag, and a
//!   type-specific body.  The codec turns typed [`Message`]s into those bytes
//!   and back.
//!
//! - **`batching`** – The greedy packing rule that decides how many encoded
//!   bets fit into one bet-batch message without exceeding a byte ceiling.

pub mod batching;
pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `lottery_core::Bet` instead of `lottery_core::domain::bet::Bet`.
pub use batching::builder::{Batch, BatchBuilder, ConfigurationError};
pub use domain::bet::Bet;
pub use protocol::codec::{
    decode_bet_batch, decode_confirmation, decode_message, decode_winners, encode_batch,
    encode_confirmation, encode_finalization, encode_message, encode_record, encode_winner_query,
    encode_winners, EncodingError, ProtocolError,
};
pub use protocol::messages::Message;
