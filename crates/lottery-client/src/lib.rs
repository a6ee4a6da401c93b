//! lottery-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does lottery-client do? (for beginners)
//!
//! Each lottery agency runs one client.  The client:
//!
//! 1. Reads the agency's bets from a headerless CSV file, one bet per line.
//! 2. Connects to the central server over TCP.
//! 3. Packs the bets into batches that never exceed the configured byte
//!    ceiling and sends them one at a time, waiting for the server's
//!    confirmation after each batch.
//! 4. Tells the server it has no more bets (finalization).
//! 5. Asks for the agency's winners and reports them.
//!
//! The use case in [`application::submit_bets`] only talks to the network
//! through the [`application::frame_channel::FrameChannel`] port, so the
//! whole sequence can be tested against a scripted channel without sockets.

/// Application layer: the frame-channel port and the submit use case.
pub mod application;

/// Infrastructure layer: TCP transport, CSV source, config file, logging observer.
pub mod infrastructure;
