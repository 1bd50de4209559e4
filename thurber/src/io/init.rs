//! Canonical `.thurber/` layout and `thurber init` scaffolding.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use super::config::{ThurberConfig, write_config};

/// All canonical paths within `.thurber/` for a project root.
#[derive(Debug, Clone)]
pub struct ThurberPaths {
    pub root: PathBuf,
    pub thurber_dir: PathBuf,
    pub state_dir: PathBuf,
    pub config_path: PathBuf,
    pub goals_path: PathBuf,
    pub problem_path: PathBuf,
}

impl ThurberPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let thurber_dir = root.join(".thurber");
        let state_dir = thurber_dir.join("state");
        Self {
            root: root.clone(),
            thurber_dir: thurber_dir.clone(),
            state_dir: state_dir.clone(),
            config_path: thurber_dir.join("config.toml"),
            goals_path: state_dir.join("goals.json"),
            problem_path: state_dir.join("problem.json"),
        }
    }
}

/// Create `.thurber/state/` and a default `config.toml`.
///
/// An existing config is left alone unless `force` is set. Durable records are
/// never touched here; they are created on first save.
pub fn init_layout(root: &Path, force: bool) -> Result<ThurberPaths> {
    let paths = ThurberPaths::new(root);
    fs::create_dir_all(&paths.state_dir)
        .with_context(|| format!("create {}", paths.state_dir.display()))?;

    if force || !paths.config_path.exists() {
        write_config(&paths.config_path, &ThurberConfig::default())?;
        info!(path = %paths.config_path.display(), "wrote default config");
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::config::load_config;

    #[test]
    fn init_creates_state_dir_and_config() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = init_layout(temp.path(), false).expect("init");
        assert!(paths.state_dir.is_dir());
        assert_eq!(
            load_config(&paths.config_path).expect("load"),
            ThurberConfig::default()
        );
    }

    #[test]
    fn init_keeps_existing_config_unless_forced() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = ThurberPaths::new(temp.path());
        fs::create_dir_all(&paths.thurber_dir).expect("dir");
        fs::write(&paths.config_path, "model = \"custom\"\n").expect("write");

        init_layout(temp.path(), false).expect("init");
        assert_eq!(load_config(&paths.config_path).expect("load").model, "custom");

        init_layout(temp.path(), true).expect("init --force");
        assert_eq!(load_config(&paths.config_path).expect("load").model, "llama2");
    }
}
