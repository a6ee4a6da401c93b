//! Size-bounded batching of encoded bets.
//!
//! # Why batch at all? (for beginners)
//!
//! Sending one TCP message per bet would cost one round trip per bet, because
//! the server confirms every message before the client sends the next one.
//! Grouping bets amortises that round trip.  The server, however, refuses
//! messages above a configured size, so the client must decide *how many*
//! bets fit before it sends anything.
//!
//! [`builder::BatchBuilder`] makes that decision greedily, in source order,
//! without ever reordering or splitting a bet.

pub mod builder;

pub use builder::{Batch, BatchBuilder, ConfigurationError};
