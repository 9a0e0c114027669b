//! Credential settings file.
//!
//! The file is INI with a single `jgi` section:
//!
//! ```ini
//! [jgi]
//! username = exampleuser
//! password = examplepassword
//! ```
//!
//! `:` works as a separator too. Section and key names are matched without
//! regard to case.

use crate::error::{Error, Result};
use crate::session::Credentials;

use ini::Ini;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the section holding the credentials.
pub const SECTION: &str = "jgi";

/// `<platform config dir>/portal-fetch/config.ini`, when the platform has a
/// config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(env!("CARGO_PKG_NAME")).join("config.ini"))
}

/// Load credentials from `path`, or from [`default_config_path`] when no
/// path is given.
pub fn load_credentials(path: Option<&Path>) -> Result<Credentials> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => default_config_path()
            .ok_or_else(|| Error::Config("no configuration directory on this platform".into()))?,
    };
    debug!("Reading credentials from {:?}", path);

    if !path.exists() {
        return Err(Error::Config(format!(
            "Config file not present. Checked: {}",
            path.display()
        )));
    }
    let ini = Ini::load_from_file(&path).map_err(|e| improperly_formatted(&path, e))?;
    credentials_from_ini(&ini).ok_or_else(|| improperly_formatted(&path, "missing credentials"))
}

/// Parse credentials from the text of a settings file.
pub fn parse_credentials(text: &str) -> Result<Credentials> {
    let ini = Ini::load_from_str(text).map_err(|e| Error::Config(e.to_string()))?;
    credentials_from_ini(&ini).ok_or_else(|| {
        Error::Config(format!(
            "expected a [{}] section with username and password",
            SECTION
        ))
    })
}

fn credentials_from_ini(ini: &Ini) -> Option<Credentials> {
    let mut username = None;
    let mut password = None;

    let sections = ini
        .iter()
        .filter(|(name, _)| name.is_some_and(|n| n.eq_ignore_ascii_case(SECTION)));
    for (_, properties) in sections {
        for (key, value) in properties.iter() {
            if key.eq_ignore_ascii_case("username") {
                username = Some(value);
            } else if key.eq_ignore_ascii_case("password") {
                password = Some(value);
            }
        }
    }

    Some(Credentials::new(username?, password?))
}

fn improperly_formatted(path: &Path, reason: impl std::fmt::Display) -> Error {
    Error::Config(format!(
        "The configuration file ({}) is improperly formatted: {}",
        path.display(),
        reason
    ))
}
