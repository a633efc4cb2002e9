// src/core/config_manager.rs
//! Configuration loading: `config.yaml` sections plus environment overrides

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

const CONFIG_FILE: &str = "config.yaml";
const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/api";
const DEFAULT_LOG_FILE: &str = "/tmp/offermatrix.log";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment_name: String,
    pub environment: EnvironmentConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(default = "default_api_url")]
    pub api_base_url: String,
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Unset keeps the unbounded wait on list edits
    #[serde(default)]
    pub mutation_timeout_seconds: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentConfig,
    production: Option<EnvironmentConfig>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_state_path() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(".offermatrix").join("state.toml"),
        Err(_) => PathBuf::from(".offermatrix").join("state.toml"),
    }
}

fn default_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_url(),
            state_path: default_state_path(),
            log_file: default_log_file(),
            request_timeout_seconds: default_request_timeout(),
            mutation_timeout_seconds: None,
        }
    }
}

impl EnvironmentConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn mutation_timeout(&self) -> Option<Duration> {
        self.mutation_timeout_seconds
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

impl ConfigManager {
    /// Load `config.yaml` from the working directory (optional) and apply
    /// `OFFERMATRIX_*` overrides from the process environment.
    pub fn load() -> Result<Self> {
        let env_name = Self::get_environment();
        let mut manager = Self::load_from(Path::new(CONFIG_FILE), &env_name)?;
        manager.apply_overrides(|key| std::env::var(key).ok());
        Ok(manager)
    }

    fn get_environment() -> String {
        std::env::var("OFFERMATRIX_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    pub fn load_from(config_path: &Path, environment: &str) -> Result<Self> {
        info!("Loading configuration for environment: {}", environment);

        let env_config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let file: ConfigFile = serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", config_path.display()))?;

            match environment {
                "production" => file
                    .production
                    .context("config.yaml has no production section")?,
                _ => file.local,
            }
        } else {
            info!("{} not found, using built-in defaults", config_path.display());
            EnvironmentConfig::default()
        };

        Ok(Self {
            environment_name: environment.to_string(),
            environment: EnvironmentConfig {
                state_path: expand_home(&env_config.state_path),
                log_file: expand_home(&env_config.log_file),
                ..env_config
            },
        })
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("OFFERMATRIX_API_URL") {
            self.environment.api_base_url = url;
        }
        if let Some(path) = lookup("OFFERMATRIX_STATE_PATH") {
            self.environment.state_path = expand_home(Path::new(&path));
        }
        if let Some(path) = lookup("OFFERMATRIX_LOG_FILE") {
            self.environment.log_file = expand_home(Path::new(&path));
        }
        if let Some(secs) = lookup("OFFERMATRIX_MUTATION_TIMEOUT").and_then(|s| s.parse().ok()) {
            self.environment.mutation_timeout_seconds = Some(secs);
        }
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), std::env::var("HOME")) {
        (Ok(rest), Ok(home)) => PathBuf::from(home).join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SAMPLE: &str = r#"
local:
  api_base_url: http://localhost:8080/api
  state_path: /tmp/om/state.toml
  mutation_timeout_seconds: 15
production:
  api_base_url: https://offers.example.com/api
  state_path: /var/lib/om/state.toml
  log_file: /var/log/om.log
  request_timeout_seconds: 60
"#;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::load_from(&dir.path().join("config.yaml"), "local").unwrap();
        assert_eq!(manager.environment.api_base_url, DEFAULT_API_URL);
        assert_eq!(manager.environment.mutation_timeout(), None);
    }

    #[test]
    fn test_sections_by_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, SAMPLE).unwrap();

        let local = ConfigManager::load_from(&path, "local").unwrap();
        assert_eq!(local.environment.api_base_url, "http://localhost:8080/api");
        assert_eq!(local.environment.log_file, PathBuf::from(DEFAULT_LOG_FILE));
        assert_eq!(
            local.environment.mutation_timeout(),
            Some(Duration::from_secs(15))
        );

        let prod = ConfigManager::load_from(&path, "production").unwrap();
        assert_eq!(prod.environment.request_timeout(), Duration::from_secs(60));
        assert_eq!(prod.environment.state_path, PathBuf::from("/var/lib/om/state.toml"));
    }

    #[test]
    fn test_env_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager =
            ConfigManager::load_from(&dir.path().join("config.yaml"), "local").unwrap();
        let vars: HashMap<&str, &str> = [
            ("OFFERMATRIX_API_URL", "http://10.0.0.2:9000/api"),
            ("OFFERMATRIX_MUTATION_TIMEOUT", "5"),
        ]
        .into_iter()
        .collect();

        manager.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(manager.environment.api_base_url, "http://10.0.0.2:9000/api");
        assert_eq!(manager.environment.mutation_timeout_seconds, Some(5));
    }

    #[test]
    fn test_zero_mutation_timeout_means_unbounded() {
        let config = EnvironmentConfig {
            mutation_timeout_seconds: Some(0),
            ..Default::default()
        };
        assert_eq!(config.mutation_timeout(), None);
    }
}
