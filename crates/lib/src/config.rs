//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.deen/config.json`) and environment.
//! Command-line flags are applied on top by the binaries.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Endpoint used when neither config nor environment sets one.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/chat";

/// Label prepended to every rendered reply.
pub const DEFAULT_PREFIX: &str = "DeenGPT";

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Chat endpoint and transport settings.
    #[serde(default)]
    pub client: ClientConfig,

    /// How replies are rendered.
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Where the chat service lives and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Full URL of the chat route (default http://127.0.0.1:5000/chat). Overridden by DEEN_ENDPOINT env.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Whole-request timeout in seconds. When absent, the transport default applies (no timeout).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayConfig {
    /// Speaker label; lines render as "<prefix>: <reply>".
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: None,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Resolve the chat endpoint: env DEEN_ENDPOINT overrides config.
pub fn resolve_endpoint(config: &Config) -> String {
    pick_endpoint(std::env::var("DEEN_ENDPOINT").ok(), config)
}

fn pick_endpoint(env_value: Option<String>, config: &Config) -> String {
    env_value
        .and_then(|s| {
            let t = s.trim();
            if t.is_empty() {
                None
            } else {
                Some(t.to_string())
            }
        })
        .or_else(|| {
            let t = config.client.endpoint.trim();
            if t.is_empty() {
                None
            } else {
                Some(t.to_string())
            }
        })
        .unwrap_or_else(default_endpoint)
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("DEEN_CONFIG_PATH").map(PathBuf::from).unwrap_or_else(|_| {
        dirs::home_dir()
            .map(|h| h.join(".deen").join("config.json"))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    })
}

/// Load config from the given path, DEEN_CONFIG_PATH, or the default path. Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_service() {
        let config = Config::default();
        assert_eq!(config.client.endpoint, "http://127.0.0.1:5000/chat");
        assert_eq!(config.client.timeout(), None);
        assert_eq!(config.display.prefix, "DeenGPT");
    }

    #[test]
    fn empty_object_parses_to_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.client.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.display.prefix, DEFAULT_PREFIX);
    }

    #[test]
    fn camel_case_keys() {
        let config: Config = serde_json::from_str(
            r#"{"client": {"endpoint": "http://10.0.0.2:8000/chat", "timeoutSecs": 12}}"#,
        )
        .unwrap();
        assert_eq!(config.client.endpoint, "http://10.0.0.2:8000/chat");
        assert_eq!(config.client.timeout(), Some(Duration::from_secs(12)));
    }

    #[test]
    fn env_endpoint_overrides_config() {
        let config = Config::default();
        assert_eq!(
            pick_endpoint(Some(" http://example.test/chat ".to_string()), &config),
            "http://example.test/chat"
        );
    }

    #[test]
    fn blank_env_endpoint_is_ignored() {
        let mut config = Config::default();
        config.client.endpoint = "http://10.0.0.2:8000/chat".to_string();
        assert_eq!(
            pick_endpoint(Some("   ".to_string()), &config),
            "http://10.0.0.2:8000/chat"
        );
    }

    #[test]
    fn blank_config_endpoint_falls_back_to_default() {
        let mut config = Config::default();
        config.client.endpoint = String::new();
        assert_eq!(pick_endpoint(None, &config), DEFAULT_ENDPOINT);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir()
            .join(format!("deen-config-test-{}", uuid::Uuid::new_v4()))
            .join("config.json");
        let (config, used) = load_config(Some(path.clone())).unwrap();
        assert_eq!(used, path);
        assert_eq!(config.client.endpoint, DEFAULT_ENDPOINT);
    }
}
