//! HTTP server for the hangman game.
//!
//! The binary in `main.rs` wires these pieces together; they are exposed as
//! a library so integration tests can drive the router directly.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
