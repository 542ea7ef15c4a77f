//! Environment-sourced settings for the inframan CLI.
//!
//! All configuration comes in through environment variables, snapshotted
//! once at command start:
//!
//! - `PROJECT_NAME`       — project folder under `.inframan/` (default `default`)
//! - `INFRA_CONFIG_JSON`  — path to the pre-compiled terraform JSON config
//! - `NIXOS_MODULE_PATH`  — path to the NixOS module to deploy
//! - `SSH_KEY_PATH`       — identity file for SSH and colmena
//! - `SSH_CONFIG_PATH`    — full SSH config file; takes precedence over the key

use inframan_core::error::{InframanError, Result};
use inframan_core::workspace::DEFAULT_PROJECT_NAME;
use std::env;
use std::path::{Path, PathBuf};

/// Snapshot of the environment-sourced configuration.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub project_name: String,
    pub infra_config_json: Option<PathBuf>,
    pub nixos_module_path: Option<PathBuf>,
    pub ssh_key_path: Option<PathBuf>,
    pub ssh_config_path: Option<PathBuf>,
}

impl Settings {
    /// Read all settings from the process environment.
    pub fn from_env() -> Self {
        Self {
            project_name: env::var("PROJECT_NAME")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string()),
            infra_config_json: optional_path("INFRA_CONFIG_JSON"),
            nixos_module_path: optional_path("NIXOS_MODULE_PATH"),
            ssh_key_path: optional_path("SSH_KEY_PATH"),
            ssh_config_path: optional_path("SSH_CONFIG_PATH"),
        }
    }

    /// The compiled config artifact, required by `infra`.
    pub fn require_infra_config(&self) -> Result<&Path> {
        let path = self.infra_config_json.as_deref().ok_or_else(|| {
            InframanError::Environment(
                "INFRA_CONFIG_JSON environment variable is not set".to_string(),
            )
        })?;
        require_file("INFRA_CONFIG_JSON", path)?;
        Ok(path)
    }

    /// The deployment module, required by `deploy`.
    pub fn require_nixos_module(&self) -> Result<&Path> {
        let path = self.nixos_module_path.as_deref().ok_or_else(|| {
            InframanError::Environment(
                "NIXOS_MODULE_PATH environment variable is not set".to_string(),
            )
        })?;
        require_file("NIXOS_MODULE_PATH", path)?;
        Ok(path)
    }
}

fn optional_path(var: &str) -> Option<PathBuf> {
    env::var(var).ok().filter(|s| !s.is_empty()).map(PathBuf::from)
}

fn require_file(var: &str, path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(InframanError::Environment(format!(
            "{} file does not exist: {}",
            var,
            path.display()
        )))
    }
}
