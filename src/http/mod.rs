//! HTTP module containing HTTP client functionality.
//!
//! - [`client`] - client creation, cookie jar wiring and middleware
//!   configuration

pub mod client;

pub use client::{build_inner_client, with_middleware, HttpClientConfig, DEFAULT_TIMEOUT};
