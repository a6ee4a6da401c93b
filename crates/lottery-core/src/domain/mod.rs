//! Domain entities for the lottery agency client.
//!
//! This module contains plain data with no infrastructure dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! The innermost layer of the application is the **domain**.  Domain code
//! describes the things the system is about (here: a bet placed at an
//! agency) and never imports network, file-system or logging setup code.
//! Outer layers (the CSV reader, the TCP transport, the CLI) depend on the
//! domain, but the domain never depends on them.

/// A single bet placed at a lottery agency.
///
/// See [`bet::Bet`] for the main type.
pub mod bet;
