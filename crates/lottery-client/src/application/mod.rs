//! Application layer use cases for the client application.
//!
//! # What use cases does the client have?
//!
//! - **`frame_channel`** – The port through which the use case exchanges
//!   whole frames with the server.  The TCP implementation lives in
//!   `infrastructure::network`; tests use a scripted in-memory channel.
//!
//! - **`submit_bets`** – Pulls bets from a record source, batches them under
//!   the byte ceiling, sends each batch and waits for its confirmation, then
//!   finalizes and queries the agency's winners.  Progress is reported to an
//!   injected [`submit_bets::SubmitObserver`].

pub mod frame_channel;
pub mod submit_bets;
