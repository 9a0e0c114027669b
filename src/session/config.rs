//! Portal endpoints and credentials.

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, DEFAULT_TIMEOUT};

use reqwest::cookie::Jar;
use reqwest::header::HeaderMap;
use reqwest::{Proxy, Url};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Sign-on endpoint of the JGI Genome Portal.
pub const DEFAULT_LOGIN_URL: &str = "https://signon.jgi.doe.gov/signon/create";
/// Host that relative manifest URLs are served from.
pub const DEFAULT_BASE_URL: &str = "https://genome.jgi.doe.gov";
/// Cookie the sign-on endpoint sets on success.
pub const DEFAULT_SESSION_COOKIE: &str = "jgi_session";

/// Username and password for the portal.
///
/// The password never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Where and how to sign in, and where relative file URLs point.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Endpoint receiving the form-encoded login.
    pub login_url: String,
    /// Base URL relative manifest URLs are joined onto.
    pub base_url: String,
    /// Cookie whose presence proves the login worked. `None` trusts the
    /// status code alone.
    pub session_cookie: Option<String>,
    /// Form field carrying the username.
    pub login_field: String,
    /// Form field carrying the password.
    pub password_field: String,
    /// Transient-error retries for the login request only.
    pub login_retries: u32,
    /// Network timeout for every request of the session. It limits how long
    /// a connection attempt or a single read may wait, so a transfer that
    /// keeps receiving data is never interrupted.
    pub timeout: Option<Duration>,
    /// Optional proxy configuration.
    pub proxy: Option<Proxy>,
    /// Extra headers sent with every request.
    pub headers: Option<HeaderMap>,
    /// Value of the `User-Agent` header.
    pub user_agent: Option<String>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            login_url: DEFAULT_LOGIN_URL.into(),
            base_url: DEFAULT_BASE_URL.into(),
            session_cookie: Some(DEFAULT_SESSION_COOKIE.into()),
            login_field: "login".into(),
            password_field: "password".into(),
            login_retries: 2,
            timeout: Some(DEFAULT_TIMEOUT),
            proxy: None,
            headers: None,
            user_agent: HttpClientConfig::default().user_agent,
        }
    }
}

impl PortalConfig {
    /// A portal whose sign-on and file endpoints live under `base_url`.
    pub fn with_base_url(base_url: &str, login_path: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            login_url: format!("{}/{}", base, login_path.trim_start_matches('/')),
            base_url: base.to_string(),
            ..Self::default()
        }
    }

    pub(crate) fn parsed_login_url(&self) -> Result<Url> {
        parse_url(&self.login_url)
    }

    pub(crate) fn parsed_base_url(&self) -> Result<Url> {
        parse_url(&self.base_url)
    }

    pub(crate) fn http_config(&self, jar: Arc<Jar>) -> HttpClientConfig {
        HttpClientConfig {
            proxy: self.proxy.clone(),
            headers: self.headers.clone(),
            connect_timeout: self.timeout,
            read_timeout: self.timeout,
            user_agent: self.user_agent.clone(),
            cookie_jar: Some(jar),
        }
    }
}

fn parse_url(value: &str) -> Result<Url> {
    Url::parse(value)
        .map_err(|e| Error::InvalidUrl(format!("The url \"{}\" cannot be parsed: {}", value, e)))
}
