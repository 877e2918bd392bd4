//! Configuration Management
//!
//! Connection settings for the SemaphoreUI API. Values come from, in order of
//! precedence: command-line flags, environment variables, the config file,
//! built-in defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_URL: &str = "http://localhost:3000/api";

pub const ENV_URL: &str = "SEMAPHOREUI_URL";
pub const ENV_API_TOKEN: &str = "SEMAPHOREUI_API_TOKEN";
pub const ENV_TLS_SKIP_VERIFY: &str = "SEMAPHOREUI_TLS_SKIP_VERIFY";

/// Provider configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the API, including the `/api` prefix
    #[serde(default)]
    pub url: Option<String>,
    /// API token sent as a bearer token
    #[serde(default)]
    pub api_token: Option<String>,
    /// Accept invalid TLS certificates
    #[serde(default)]
    pub tls_skip_verify: Option<bool>,
}

impl Config {
    /// Get the config file path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("semaphoreui-provider"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Overlay values from the process environment
    pub fn with_env(self) -> Self {
        self.with_vars(|key| std::env::var(key).ok())
    }

    /// Overlay values from `lookup`, which maps a variable name to its value
    pub fn with_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_URL).filter(|v| !v.is_empty()) {
            self.url = Some(url);
        }
        if let Some(token) = lookup(ENV_API_TOKEN).filter(|v| !v.is_empty()) {
            self.api_token = Some(token);
        }
        if let Some(skip) = lookup(ENV_TLS_SKIP_VERIFY) {
            self.tls_skip_verify = Some(matches!(
                skip.to_ascii_lowercase().as_str(),
                "1" | "true" | "yes"
            ));
        }
        self
    }

    /// Get effective API URL (flag > env > config > default)
    pub fn effective_url(&self) -> String {
        self.url.clone().unwrap_or_else(|| DEFAULT_URL.to_string())
    }

    pub fn effective_tls_skip_verify(&self) -> bool {
        self.tls_skip_verify.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.effective_url(), DEFAULT_URL);
        assert!(!config.effective_tls_skip_verify());
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_env_overrides_file_values() {
        let config = Config {
            url: Some("http://file:3000/api".to_string()),
            api_token: Some("file-token".to_string()),
            tls_skip_verify: None,
        }
        .with_vars(vars(&[
            (ENV_URL, "https://semaphore.example.com/api"),
            (ENV_TLS_SKIP_VERIFY, "TRUE"),
        ]));

        assert_eq!(config.effective_url(), "https://semaphore.example.com/api");
        assert_eq!(config.api_token.as_deref(), Some("file-token"));
        assert!(config.effective_tls_skip_verify());
    }

    #[test]
    fn test_empty_env_values_ignored() {
        let config = Config::default().with_vars(vars(&[(ENV_URL, ""), (ENV_API_TOKEN, "")]));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_file_format() {
        let config: Config =
            serde_json::from_str(r#"{"url": "http://x/api", "api_token": "t"}"#).unwrap();
        assert_eq!(config.url.as_deref(), Some("http://x/api"));
        assert_eq!(config.tls_skip_verify, None);
    }
}
