//! Chat relay - streams upstream agent SSE to browsers as data-stream frames
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod frames;
pub mod logging;
pub mod models;
pub mod relay;
pub mod server;
pub mod sse;
pub mod traits;
pub mod upstream;
