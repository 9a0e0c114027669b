//! Authenticated portal sessions.
//!
//! [`login`] performs the one-time sign-on handshake and returns a
//! [`SessionHandle`]. The handle owns a cookie jar populated by the login
//! response and a client that sends those cookies with every request. It is
//! cheap to clone and safe to use from many workers at once: both the
//! `reqwest` client and its jar synchronize internally, and the handle itself
//! is never mutated after creation.
//!
//! # Examples
//!
//! ```rust,no_run
//! use portal_fetch::session::{login, Credentials, PortalConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = login(&PortalConfig::default(), &Credentials::new("alice", "secret")).await?;
//! let url = session.resolve("/portal/files/a.fastq.gz")?;
//! # Ok(())
//! # }
//! ```

mod config;

pub use config::{
    Credentials, PortalConfig, DEFAULT_BASE_URL, DEFAULT_LOGIN_URL, DEFAULT_SESSION_COOKIE,
};

use crate::error::{Error, Result};
use crate::http::{build_inner_client, with_middleware};

use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Response, Url};
use reqwest_middleware::ClientWithMiddleware;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Cookies and client of a signed-in portal session.
#[derive(Clone)]
pub struct SessionHandle {
    client: ClientWithMiddleware,
    jar: Arc<Jar>,
    base_url: Url,
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl SessionHandle {
    /// A session that skips the sign-on step, for portals serving files
    /// without authentication.
    pub fn anonymous(portal: &PortalConfig) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let inner = build_inner_client(&portal.http_config(jar.clone()))?;
        Ok(Self {
            client: with_middleware(inner, 0),
            jar,
            base_url: portal.parsed_base_url()?,
        })
    }

    /// Resolve a manifest URL. Relative URLs are joined onto the portal base
    /// URL; absolute URLs are returned unchanged.
    pub fn resolve(&self, url: &str) -> Result<Url> {
        self.base_url
            .join(url)
            .map_err(|e| Error::InvalidUrl(format!("The url \"{}\" cannot be parsed: {}", url, e)))
    }

    /// The base URL relative manifest URLs resolve against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Issue an authenticated GET.
    pub async fn get(&self, url: Url) -> Result<Response> {
        Ok(self.client.get(url).send().await?)
    }

    /// Whether the session holds a cookie named `name` for `url`.
    pub fn has_cookie(&self, url: &Url, name: &str) -> bool {
        jar_has_cookie(&self.jar, url, name)
    }
}

/// Sign in to the portal.
///
/// Sends one form-encoded POST with the credentials to the configured
/// sign-on URL. The login is accepted when the final response (after
/// redirects) is a success and, if [`PortalConfig::session_cookie`] is set,
/// the jar now holds that cookie. Anything else is an [`Error::Auth`].
pub async fn login(portal: &PortalConfig, credentials: &Credentials) -> Result<SessionHandle> {
    let login_url = portal.parsed_login_url()?;
    let base_url = portal.parsed_base_url()?;

    let jar = Arc::new(Jar::default());
    let inner = build_inner_client(&portal.http_config(jar.clone()))?;
    let login_client = with_middleware(inner.clone(), portal.login_retries);

    debug!("Signing in to {} as {}", login_url, credentials.username);
    let form = [
        (portal.login_field.as_str(), credentials.username.as_str()),
        (portal.password_field.as_str(), credentials.password.as_str()),
    ];
    let res = login_client
        .post(login_url.clone())
        .form(&form)
        .send()
        .await
        .map_err(|e| Error::Auth(format!("sign-on request failed: {}", e)))?;

    let status = res.status();
    if !status.is_success() {
        return Err(Error::Auth(format!("sign-on answered with HTTP {}", status)));
    }

    if let Some(ref cookie) = portal.session_cookie {
        if !jar_has_cookie(&jar, &login_url, cookie) {
            return Err(Error::Auth(format!(
                "sign-on did not set the \"{}\" session cookie",
                cookie
            )));
        }
    }

    debug!("Signed in to {}", login_url);
    Ok(SessionHandle {
        client: with_middleware(inner, 0),
        jar,
        base_url,
    })
}

fn jar_has_cookie(jar: &Jar, url: &Url, name: &str) -> bool {
    let Some(header) = jar.cookies(url) else {
        return false;
    };
    let Ok(cookies) = header.to_str() else {
        return false;
    };
    cookies
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .any(|(key, _)| key.trim() == name)
}
