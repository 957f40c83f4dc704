//! API credentials, persisted to disk.
//!
//! The credentials file is stored at `~/.config/scrobbler/credentials.json`
//! and contains:
//!
//! ```json
//! { "api_key": "b25b95...", "secret": "4b8f3a...", "session_key": "d580d5..." }
//! ```
//!
//! `api_key` and `secret` come from the Last.fm API account page. The
//! `session_key` is issued by `auth.getSession` after the user authorizes
//! the application, and is only needed for write methods such as `track.love`.

use crate::error::{Result, ScrobblerError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Immutable credential set shared by every request of a client.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Credentials {
    api_key: Option<String>,
    secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_key: Option<String>,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    #[must_use]
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    #[must_use]
    pub fn with_session_key(mut self, session_key: impl Into<String>) -> Self {
        self.session_key = Some(session_key.into());
        self
    }

    /// Drop the session key, keeping the API account.
    #[must_use]
    pub fn without_session_key(mut self) -> Self {
        self.session_key = None;
        self
    }

    /// The API key, if set and non-empty.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }

    /// The shared secret, if set and non-empty.
    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref().filter(|s| !s.is_empty())
    }

    pub fn session_key(&self) -> Option<&str> {
        self.session_key.as_deref().filter(|s| !s.is_empty())
    }

    /// Load credentials from `~/.config/scrobbler/credentials.json`.
    ///
    /// Returns empty credentials if the file does not exist.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Save credentials to disk, creating parent directories if needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(&path, data)?;
        Ok(())
    }

    /// Delete the credentials file from disk.
    pub fn clear() -> Result<()> {
        let path = Self::path()?;
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    pub fn path() -> Result<PathBuf> {
        let config = dirs::config_dir()
            .ok_or_else(|| ScrobblerError::Other("cannot determine config directory".into()))?;
        Ok(config.join("scrobbler").join("credentials.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_count_as_unset() {
        let c = Credentials::new("").with_secret("");
        assert_eq!(c.api_key(), None);
        assert_eq!(c.secret(), None);
        assert_eq!(Credentials::default().session_key(), None);
    }

    #[test]
    fn json_shape() {
        let c = Credentials::new("K").with_secret("S");
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, r#"{"api_key":"K","secret":"S"}"#);
        let back: Credentials = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn missing_fields_deserialize_as_unset() {
        let c: Credentials = serde_json::from_str(r#"{"api_key":"K"}"#).unwrap();
        assert_eq!(c.api_key(), Some("K"));
        assert_eq!(c.secret(), None);
    }

    #[test]
    fn logout_keeps_api_account() {
        let c = Credentials::new("K")
            .with_secret("S")
            .with_session_key("SK")
            .without_session_key();
        assert_eq!(c, Credentials::new("K").with_secret("S"));
    }
}
