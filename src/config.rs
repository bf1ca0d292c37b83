//! Local configuration. Finds the session cookie without hardcoding it:
//! the `XHS_COOKIE` environment variable wins, then a JSON config file.

use crate::error::XhsError;
use serde::Deserialize;
use std::path::Path;

/// Environment variable checked first for the session cookie
pub const COOKIE_ENV_VAR: &str = "XHS_COOKIE";

/// Config file checked in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "config.local.json";

/// Contents of the local config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalConfig {
    /// Browser session cookie string
    #[serde(default)]
    pub cookie: Option<String>,
    /// Proxy URL to route requests through
    #[serde(default)]
    pub proxy: Option<String>,
}

impl LocalConfig {
    /// Read and parse a config file.
    ///
    /// # Errors
    ///
    /// Returns [`XhsError::ClientInit`] if the file cannot be read or is
    /// not valid JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, XhsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| {
            XhsError::ClientInit(format!("failed to read {}: {err}", path.display()))
        })?;
        serde_json::from_str(&text).map_err(|err| {
            XhsError::ClientInit(format!("failed to parse {}: {err}", path.display()))
        })
    }
}

/// Load the local config file, if one exists.
///
/// `path` overrides the default location. A missing file is not an error.
///
/// # Errors
///
/// Returns [`XhsError::ClientInit`] if a file exists but cannot be parsed.
pub fn load_local_config(path: Option<&Path>) -> Result<Option<LocalConfig>, XhsError> {
    let path = path.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
    if !path.exists() {
        return Ok(None);
    }
    LocalConfig::from_file(path).map(Some)
}

/// The session cookie from the environment, if set and non-empty.
pub fn cookie_from_env() -> Option<String> {
    std::env::var(COOKIE_ENV_VAR)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Resolve the session cookie: environment first, then the config file.
///
/// # Errors
///
/// Returns [`XhsError::ClientInit`] if a config file exists but cannot be
/// parsed.
pub fn resolve_cookie(config_path: Option<&Path>) -> Result<Option<String>, XhsError> {
    if let Some(cookie) = cookie_from_env() {
        return Ok(Some(cookie));
    }
    Ok(load_local_config(config_path)?
        .and_then(|config| config.cookie)
        .filter(|cookie| !cookie.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_file_parses_cookie_and_proxy() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"cookie": "a1=abc; web_session=xyz", "proxy": "http://127.0.0.1:7890"}"#)
            .unwrap();
        let config = LocalConfig::from_file(file.path()).unwrap();
        assert_eq!(config.cookie.as_deref(), Some("a1=abc; web_session=xyz"));
        assert_eq!(config.proxy.as_deref(), Some("http://127.0.0.1:7890"));
    }

    #[test]
    fn test_missing_fields_default_to_none() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{}").unwrap();
        let config = LocalConfig::from_file(file.path()).unwrap();
        assert!(config.cookie.is_none());
        assert!(config.proxy.is_none());
    }

    #[test]
    fn test_load_missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("config.local.json");
        assert!(load_local_config(Some(&missing)).unwrap().is_none());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{not json").unwrap();
        assert!(matches!(
            load_local_config(Some(file.path())),
            Err(XhsError::ClientInit(_))
        ));
    }

    #[test]
    fn test_resolve_cookie_skips_empty_value() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"cookie": "  "}"#).unwrap();
        assert!(resolve_cookie(Some(file.path())).unwrap().is_none());
    }
}
