//! HTTP client setup and middleware configuration.
//!
//! Every client of a session shares one inner `reqwest::Client` (and therefore
//! one cookie jar and one connection pool) and is wrapped in
//! `reqwest-middleware` with request tracing. Transient-error retries are
//! only layered on when asked for: the worker pool counts its own attempts
//! per file, so file downloads go through a client without the retry layer.
//!
//! Timeouts bound how long the connection may sit idle, never the total
//! length of a transfer: a large file that keeps streaming is never cut off.
//!
//! # Examples
//!
//! ```rust
//! use portal_fetch::http::{build_inner_client, with_middleware, HttpClientConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let inner = build_inner_client(&HttpClientConfig::default())?;
//! let client = with_middleware(inner, 2);
//! # Ok(())
//! # }
//! ```

use reqwest::{cookie::Jar, header::HeaderMap, Proxy};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use reqwest_tracing::TracingMiddleware;
use std::sync::Arc;
use std::time::Duration;

/// Default connect and read timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for HTTP client setup.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Optional proxy configuration.
    pub proxy: Option<Proxy>,
    /// Default headers to include with all requests.
    pub headers: Option<HeaderMap>,
    /// Limit for establishing a connection.
    pub connect_timeout: Option<Duration>,
    /// Limit for a single read. It restarts whenever data arrives.
    pub read_timeout: Option<Duration>,
    /// Value of the `User-Agent` header.
    pub user_agent: Option<String>,
    /// Cookie jar shared by every request of the client.
    pub cookie_jar: Option<Arc<Jar>>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            proxy: None,
            headers: None,
            connect_timeout: Some(DEFAULT_TIMEOUT),
            read_timeout: Some(DEFAULT_TIMEOUT),
            user_agent: Some(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).into()),
            cookie_jar: None,
        }
    }
}

/// Build the plain `reqwest` client described by `config`.
pub fn build_inner_client(config: &HttpClientConfig) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = reqwest::Client::builder();

    if let Some(ref proxy) = config.proxy {
        builder = builder.proxy(proxy.clone());
    }

    if let Some(ref headers) = config.headers {
        builder = builder.default_headers(headers.clone());
    }

    if let Some(timeout) = config.connect_timeout {
        builder = builder.connect_timeout(timeout);
    }

    if let Some(timeout) = config.read_timeout {
        builder = builder.read_timeout(timeout);
    }

    if let Some(ref user_agent) = config.user_agent {
        builder = builder.user_agent(user_agent.clone());
    }

    if let Some(ref jar) = config.cookie_jar {
        builder = builder.cookie_provider(jar.clone());
    }

    builder.build()
}

/// Wrap an existing client with tracing and, when `retries > 0`, retries.
pub fn with_middleware(client: reqwest::Client, retries: u32) -> ClientWithMiddleware {
    let builder = ClientBuilder::new(client).with(TracingMiddleware::default());

    if retries == 0 {
        return builder.build();
    }

    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(retries);
    builder
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build()
}
