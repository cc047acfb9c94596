//! lircd - connection and session core of an IRC daemon.
//!
//! The binary in `main.rs` wires these modules together; the library
//! exists so integration tests can run a [`network::Gateway`] in-process.

pub mod config;
pub mod error;
pub mod handlers;
pub mod http;
pub mod metrics;
pub mod network;
pub mod state;
pub mod telemetry;
