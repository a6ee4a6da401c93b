//! Storage infrastructure: configuration file loading.
//!
//! The `config` sub-module reads the optional TOML file that supplies
//! defaults for settings not given on the command line or in the
//! environment.

pub mod config;
