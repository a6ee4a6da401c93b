//! Protocol module containing message types and the binary codec.

pub mod codec;
pub mod messages;

pub use codec::{decode_message, encode_message, EncodingError, ProtocolError};
pub use messages::*;
