//! Core library for the `webclient-latency` CLI.
//!
//! The binary signs one authenticated GET request, then drives it through
//! each selected async HTTP engine in warmup and measured batches, recording
//! how long the non-blocking `dispatch()` call takes and waiting for every
//! response to arrive. The library exposes the same building blocks so the
//! engines and the driver can be exercised directly.
pub mod args;
pub mod auth;
pub mod bench;
pub mod config;
pub mod entry;
pub mod error;
pub mod http;
pub mod logger;
pub mod metrics;
