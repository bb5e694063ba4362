//! On-disk configuration: broker endpoint, shared topic, identity, and
//! reconnection policy.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

fn default_broker_host() -> String {
    "broker.hivemq.com".to_string()
}

fn default_broker_port() -> u16 {
    1883
}

fn default_topic() -> String {
    "termchat/lt/v1".to_string()
}

fn default_retry_delay_ms() -> u64 {
    5_000
}

fn default_retry_on_failure() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_broker_host")]
    pub broker_host: String,
    #[serde(default = "default_broker_port")]
    pub broker_port: u16,
    #[serde(default = "default_topic")]
    pub topic: String,
    /// Fixed nickname; a random `Anon####` identity is generated when unset.
    pub nickname: Option<String>,
    /// Delay before a scheduled reconnect attempt.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Retry after a failed connect attempt.
    #[serde(default = "default_retry_on_failure")]
    pub retry_on_failure: bool,
    /// Retry after an established connection drops. Off by default: a lost
    /// link stays down until the user exits and restarts, while a connect
    /// that never succeeded keeps retrying. Flip this to make the two paths
    /// symmetric.
    #[serde(default)]
    pub retry_on_connection_lost: bool,
    /// UI theme name ("dark" or "green").
    pub theme: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            broker_host: default_broker_host(),
            broker_port: default_broker_port(),
            topic: default_topic(),
            nickname: None,
            retry_delay_ms: default_retry_delay_ms(),
            retry_on_failure: default_retry_on_failure(),
            retry_on_connection_lost: false,
            theme: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Config, Box<dyn std::error::Error>> {
        match Self::config_path() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn load_from_path(config_path: &PathBuf) -> Result<Config, Box<dyn std::error::Error>> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to_path(&self, config_path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("lt", "termchat", "termchat")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.broker_host, "broker.hivemq.com");
        assert_eq!(config.topic, "termchat/lt/v1");
        assert!(config.retry_on_failure);
        assert!(!config.retry_on_connection_lost);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "broker_host = \"test.mosquitto.org\"\n").unwrap();
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.broker_host, "test.mosquitto.org");
        assert_eq!(config.broker_port, 1883);
        assert_eq!(config.retry_delay_ms, 5_000);
    }

    #[test]
    fn round_trips_through_save() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.nickname = Some("Ghost".to_string());
        config.retry_on_connection_lost = true;
        config.save_to_path(&path).unwrap();

        let reloaded = Config::load_from_path(&path).unwrap();
        assert_eq!(reloaded.nickname.as_deref(), Some("Ghost"));
        assert!(reloaded.retry_on_connection_lost);
    }
}
