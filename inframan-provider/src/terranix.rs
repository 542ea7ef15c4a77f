//! Terranix invocation: compiling a Nix infrastructure module into the
//! terraform JSON config, or staging a pre-compiled artifact.

use inframan_core::command::capture_stdout;
use inframan_core::error::{InframanError, Result};
use inframan_core::workspace::{ensure_dir, Workspace, CONFIG_FILE_NAME};
use std::fs;
use std::path::{Path, PathBuf};

/// Produces `config.tf.json` inside `<project>/terraform/`.
pub struct TerranixExecutor {
    work_dir: PathBuf,
}

impl TerranixExecutor {
    pub fn new(workspace: &Workspace, project: &str) -> Result<Self> {
        let work_dir = workspace.terraform_dir(project);
        ensure_dir(&work_dir)?;
        Ok(Self { work_dir })
    }

    /// Run `terranix <file>` and write its JSON output as the terraform
    /// config artifact.
    pub fn build(&self, nix_file: &Path) -> Result<PathBuf> {
        let nix_file = fs::canonicalize(nix_file).map_err(|_| {
            InframanError::Environment(format!("nix file does not exist: {}", nix_file.display()))
        })?;

        let json = capture_stdout("terranix", &[nix_file.as_os_str()], &self.work_dir)?;

        let target = self.work_dir.join(CONFIG_FILE_NAME);
        fs::write(&target, json).map_err(|e| {
            InframanError::Filesystem(format!(
                "failed to write terraform config {}: {}",
                target.display(),
                e
            ))
        })?;
        Ok(target)
    }

    /// Copy a pre-compiled JSON config (e.g. produced by a flake) into the
    /// work dir as the terraform config artifact.
    pub fn build_from_config(&self, config_path: &Path) -> Result<PathBuf> {
        let data = fs::read(config_path).map_err(|e| {
            InframanError::Filesystem(format!(
                "failed to read config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        let target = self.work_dir.join(CONFIG_FILE_NAME);
        fs::write(&target, data).map_err(|e| {
            InframanError::Filesystem(format!(
                "failed to write config file {}: {}",
                target.display(),
                e
            ))
        })?;
        Ok(target)
    }

    pub fn config_path(&self) -> PathBuf {
        self.work_dir.join(CONFIG_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn build_from_config_stages_artifact() {
        let tmp = TempDir::new().unwrap();
        let workspace = Workspace::at(tmp.path().join(".inframan"));
        let source = tmp.path().join("flake-output.json");
        fs::write(&source, br#"{"provider":{}}"#).unwrap();

        let executor = TerranixExecutor::new(&workspace, "default").unwrap();
        let staged = executor.build_from_config(&source).unwrap();

        assert_eq!(staged, executor.config_path());
        assert_eq!(fs::read(staged).unwrap(), br#"{"provider":{}}"#);
    }

    #[test]
    fn build_rejects_missing_nix_file() {
        let tmp = TempDir::new().unwrap();
        let workspace = Workspace::at(tmp.path().join(".inframan"));
        let executor = TerranixExecutor::new(&workspace, "default").unwrap();

        let err = executor.build(&tmp.path().join("missing.nix")).unwrap_err();
        assert!(matches!(err, InframanError::Environment(_)));
        assert!(err.to_string().contains("missing.nix"));
    }
}
