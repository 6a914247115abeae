//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//!
//! The channel sink used in production is implemented directly on
//! `tokio::sync::mpsc::Sender` in `crate::traits::sink`.
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles for both traits.

pub mod mock;
pub mod reqwest_http;

pub use mock::{MockHttpClient, MockResponse, RecordingSink};
pub use reqwest_http::ReqwestHttpClient;
