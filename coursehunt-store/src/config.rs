//! The persisted configuration record.

use chrono::{DateTime, Local};
use coursehunt_core::SessionCredential;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::StoreError;
use crate::persistence::{self, default_config_path};

/// Application configuration, loaded once per invocation, mutated in
/// memory, and saved back unconditionally at command exit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Campus account username.
    #[serde(default)]
    pub username: Option<String>,
    /// Campus account password.
    #[serde(default)]
    pub password: Option<String>,
    /// Scheduled hunting start time.
    #[serde(default)]
    pub target_time: Option<DateTime<Local>>,
    /// Delay between claim attempts, in seconds.
    #[serde(default = "default_wait_time")]
    pub wait_time: u64,
    /// Cached session credential from the last login.
    #[serde(default)]
    pub session: Option<SessionCredential>,
    /// Ceiling on recoverable failures per session.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Per-call network timeout, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_wait_time() -> u64 {
    2
}

fn default_max_retries() -> u32 {
    3
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            target_time: None,
            wait_time: default_wait_time(),
            session: None,
            max_retries: default_max_retries(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Loads configuration from the default path.
    pub async fn load() -> Result<Self, StoreError> {
        Self::load_from(&default_config_path()).await
    }

    /// Loads configuration from a specific path. A missing file yields the
    /// defaults; a malformed one is an error.
    pub async fn load_from(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        persistence::load_json(path).await
    }

    /// Saves configuration to the default path.
    pub async fn save(&self) -> Result<(), StoreError> {
        self.save_to(&default_config_path()).await
    }

    /// Saves configuration to a specific path.
    pub async fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        persistence::save_json(path, self).await
    }

    /// Field name/value pairs for the `list config` display.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        fn opt(value: Option<&str>) -> String {
            value.unwrap_or("-").to_string()
        }

        vec![
            ("username", opt(self.username.as_deref())),
            ("password", opt(self.password.as_deref())),
            (
                "target_time",
                self.target_time
                    .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
            ),
            ("wait_time", self.wait_time.to_string()),
            (
                "session",
                opt(self.session.as_ref().map(SessionCredential::as_str)),
            ),
            ("max_retries", self.max_retries.to_string()),
            (
                "request_timeout_secs",
                self.request_timeout_secs.to_string(),
            ),
        ]
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json"))
            .await
            .unwrap();
        assert_eq!(config.wait_time, 2);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.username.is_none());
    }

    #[tokio::test]
    async fn test_roundtrip_preserves_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = Config {
            username: Some("student".to_string()),
            password: Some("secret".to_string()),
            wait_time: 5,
            session: Some(SessionCredential::new("route=r1; JSESSIONID=j1")),
            max_retries: 7,
            ..Config::default()
        };
        config.save_to(&path).await.unwrap();

        let back = Config::load_from(&path).await.unwrap();
        assert_eq!(back.username.as_deref(), Some("student"));
        assert_eq!(back.wait_time, 5);
        assert_eq!(back.max_retries, 7);
        assert_eq!(
            back.session.as_ref().map(SessionCredential::as_str),
            Some("route=r1; JSESSIONID=j1")
        );
    }

    #[tokio::test]
    async fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, r#"{"username":"student"}"#)
            .await
            .unwrap();

        let config = Config::load_from(&path).await.unwrap();
        assert_eq!(config.username.as_deref(), Some("student"));
        assert_eq!(config.wait_time, 2);
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let err = Config::load_from(&path).await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[test]
    fn test_entries_cover_every_field() {
        let entries = Config::default().entries();
        assert_eq!(entries.len(), 7);
        assert!(entries.iter().any(|(k, _)| *k == "max_retries"));
    }
}
