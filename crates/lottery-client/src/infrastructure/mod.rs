//! Infrastructure layer for the client application.
//!
//! Contains the adapters that touch the outside world: the TCP frame
//! transport, the CSV bet file, the TOML config file, and the `tracing`
//! observer.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `lottery_core`, but MUST NOT be imported by the `application` layer
//! (test code excepted).
//!
//! # Sub-modules
//!
//! - **`network`** – `FrameTransport`, the `FrameChannel` implementation over
//!   any tokio byte stream, plus `connect` for TCP.  Reissues reads and writes
//!   until each frame is complete.  A scripted in-memory channel lives in
//!   `network::mock` for tests.
//!
//! - **`record_source`** – Reads bets lazily from the agency's headerless CSV
//!   file.
//!
//! - **`storage`** – Loads the optional TOML configuration file.
//!
//! - **`observer`** – Turns submit progress callbacks into log events.

pub mod network;
pub mod observer;
pub mod record_source;
pub mod storage;
