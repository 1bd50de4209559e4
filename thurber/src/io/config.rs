//! Session configuration stored under `.thurber/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Session configuration (TOML).
///
/// Missing fields fall back to a local Ollama server running `llama2`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ThurberConfig {
    /// Model identifier sent with every completion request.
    pub model: String,

    /// Chat completion endpoint (`POST`, non-streaming).
    pub endpoint: String,

    /// Seconds of operator silence before background work runs.
    pub idle_timeout_secs: u64,

    /// Environment variable holding an optional bearer token for the endpoint.
    pub api_key_env: String,
}

impl Default for ThurberConfig {
    fn default() -> Self {
        Self {
            model: "llama2".to_string(),
            endpoint: "http://localhost:11434/api/chat".to_string(),
            idle_timeout_secs: 30,
            api_key_env: "OLLAMA_API_KEY".to_string(),
        }
    }
}

impl ThurberConfig {
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(anyhow!("model must be non-empty"));
        }
        if self.endpoint.trim().is_empty() {
            return Err(anyhow!("endpoint must be non-empty"));
        }
        if self.idle_timeout_secs == 0 {
            return Err(anyhow!("idle_timeout_secs must be > 0"));
        }
        Ok(())
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Bearer token from the configured environment variable, if set and non-empty.
    pub fn api_key(&self) -> Option<String> {
        if self.api_key_env.trim().is_empty() {
            return None;
        }
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ThurberConfig::default()`.
pub fn load_config(path: &Path) -> Result<ThurberConfig> {
    if !path.exists() {
        let cfg = ThurberConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ThurberConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &ThurberConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    super::write_atomic(path, &buf)
}

/// Load variables from `<root>/.env` into the process environment.
///
/// Variables that are already set keep their values. Returns the file path when
/// one was loaded; a missing file is not an error.
pub fn load_dotenv(root: &Path) -> Option<PathBuf> {
    let path = root.join(".env");
    match dotenvy::from_path(&path) {
        Ok(()) => {
            debug!(path = %path.display(), "loaded environment file");
            Some(path)
        }
        Err(err) if err.not_found() => None,
        Err(err) => {
            warn!(path = %path.display(), err = %err, "ignoring environment file");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, ThurberConfig::default());
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        let cfg = ThurberConfig {
            model: "mistral".to_string(),
            idle_timeout_secs: 5,
            ..ThurberConfig::default()
        };
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "model = \"phi3\"\n").expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.model, "phi3");
        assert_eq!(cfg.idle_timeout_secs, 30);
    }

    #[test]
    fn zero_idle_timeout_is_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "idle_timeout_secs = 0\n").expect("write");
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("idle_timeout_secs"));
    }

    #[test]
    fn blank_api_key_env_disables_auth() {
        let cfg = ThurberConfig {
            api_key_env: String::new(),
            ..ThurberConfig::default()
        };
        assert_eq!(cfg.api_key(), None);
    }

    #[test]
    fn api_key_is_read_from_dotenv_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(
            temp.path().join(".env"),
            "THURBER_CONFIG_TEST_API_KEY=from-dotenv\n",
        )
        .expect("write");

        assert_eq!(load_dotenv(temp.path()), Some(temp.path().join(".env")));

        let cfg = ThurberConfig {
            api_key_env: "THURBER_CONFIG_TEST_API_KEY".to_string(),
            ..ThurberConfig::default()
        };
        assert_eq!(cfg.api_key().as_deref(), Some("from-dotenv"));
    }

    #[test]
    fn missing_dotenv_file_is_skipped() {
        let temp = tempfile::tempdir().expect("tempdir");
        assert_eq!(load_dotenv(temp.path()), None);
    }
}
