//! Morse Config
//!
//! Bot settings from an optional YAML file, overridden by environment
//! variables.
//!
//! Lookup order for the file:
//! 1. an explicit path (e.g. `--config`)
//! 2. `$MORSE_CONFIG`
//! 3. `<config dir>/morse/config.yaml`, skipped silently when absent
//!
//! ```yaml
//! token: "123456:ABC-DEF"
//! api_url: https://api.telegram.org
//! poll_timeout_secs: 30
//! retry_delay_secs: 5
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const ENV_CONFIG_PATH: &str = "MORSE_CONFIG";
pub const ENV_TOKEN: &str = "TELEGRAM_API_TOKEN";
pub const ENV_API_URL: &str = "TELEGRAM_API_URL";
pub const ENV_POLL_TIMEOUT: &str = "MORSE_POLL_TIMEOUT";

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Bot token is not set. Export TELEGRAM_API_TOKEN or add `token` to the config file.")]
    MissingToken,

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Telegram bot settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Bot API token issued by @BotFather
    pub token: String,

    /// Bot API base URL, without trailing slash
    pub api_url: String,

    /// Long-poll timeout for getUpdates
    pub poll_timeout_secs: u64,

    /// Pause after a failed poll before retrying
    pub retry_delay_secs: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
            poll_timeout_secs: 30,
            retry_delay_secs: 5,
        }
    }
}

// Keeps the token out of logs.
impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &if self.token.is_empty() { "<unset>" } else { "<redacted>" })
            .field("api_url", &self.api_url)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("retry_delay_secs", &self.retry_delay_secs)
            .finish()
    }
}

impl BotConfig {
    /// Resolve the config file, apply environment overrides and validate.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_with(explicit, |key| std::env::var(key).ok())
    }

    /// [`BotConfig::load`] with a custom variable lookup.
    pub fn load_with(
        explicit: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let config = match explicit
            .map(Path::to_path_buf)
            .or_else(|| env(ENV_CONFIG_PATH).map(PathBuf::from))
        {
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    tracing::debug!("no config file, using defaults");
                    Self::default()
                }
            },
        };

        let config = config.with_overrides(env)?;
        config.validate()?;
        Ok(config)
    }

    /// `<config dir>/morse/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("morse").join("config.yaml"))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_yaml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_yaml(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
    }

    /// Apply `TELEGRAM_API_TOKEN`, `TELEGRAM_API_URL` and `MORSE_POLL_TIMEOUT`.
    pub fn with_overrides(mut self, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(token) = env(ENV_TOKEN) {
            self.token = token;
        }

        if let Some(url) = env(ENV_API_URL) {
            self.api_url = url;
        }

        if let Some(raw) = env(ENV_POLL_TIMEOUT) {
            self.poll_timeout_secs = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_POLL_TIMEOUT.to_string(),
                value: raw.clone(),
            })?;
        }

        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }

        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                key: "api_url".to_string(),
                value: self.api_url.clone(),
            });
        }

        Ok(())
    }

    /// `<api_url>/bot<token>/<method>`
    pub fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url.trim_end_matches('/'), self.token, method)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = BotConfig::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.poll_timeout(), Duration::from_secs(30));
        assert_eq!(config.retry_delay(), Duration::from_secs(5));
        assert!(matches!(config.validate(), Err(ConfigError::MissingToken)));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = BotConfig::from_yaml("token: abc\npoll_timeout_secs: 10\n").unwrap();
        assert_eq!(config.token, "abc");
        assert_eq!(config.poll_timeout_secs, 10);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.retry_delay_secs, 5);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(BotConfig::from_yaml("").unwrap(), BotConfig::default());
    }

    #[test]
    fn test_load_explicit_file_with_env_override() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "token: from-file\nretry_delay_secs: 1\n").unwrap();

        let config = BotConfig::load_with(
            Some(&path),
            env_from(&[(ENV_TOKEN, "from-env"), (ENV_POLL_TIMEOUT, "45")]),
        )
        .unwrap();

        assert_eq!(config.token, "from-env");
        assert_eq!(config.poll_timeout_secs, 45);
        assert_eq!(config.retry_delay_secs, 1);
    }

    #[test]
    fn test_load_path_from_env() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bot.yaml");
        std::fs::write(&path, "token: t\napi_url: http://localhost:8081\n").unwrap();

        let path_str = path.to_string_lossy().to_string();
        let config =
            BotConfig::load_with(None, env_from(&[(ENV_CONFIG_PATH, path_str.as_str())])).unwrap();

        assert_eq!(config.api_url, "http://localhost:8081");
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.yaml");

        let result = BotConfig::load_with(Some(&path), env_from(&[(ENV_TOKEN, "t")]));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "poll_timeout_secs: [not, a, number]\n").unwrap();

        let result = BotConfig::from_file(&path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_invalid_poll_timeout_env() {
        let result = BotConfig::default().with_overrides(env_from(&[(ENV_POLL_TIMEOUT, "soon")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_invalid_api_url() {
        let config = BotConfig {
            token: "t".to_string(),
            api_url: "api.telegram.org".to_string(),
            ..BotConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_method_url() {
        let config = BotConfig {
            token: "123:abc".to_string(),
            api_url: "https://api.telegram.org/".to_string(),
            ..BotConfig::default()
        };
        assert_eq!(
            config.method_url("getUpdates"),
            "https://api.telegram.org/bot123:abc/getUpdates"
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = BotConfig {
            token: "secret-token".to_string(),
            ..BotConfig::default()
        };
        let shown = format!("{config:?}");
        assert!(!shown.contains("secret-token"));
        assert!(shown.contains("<redacted>"));
    }
}
