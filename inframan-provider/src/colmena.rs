//! Colmena invocation: templating the hive manifest and applying it.

use inframan_config::Settings;
use inframan_core::command::{capture_stdout, run_interactive};
use inframan_core::error::{InframanError, Result};
use inframan_core::workspace::{ensure_dir, Workspace, HIVE_FILE_NAME};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Runs colmena commands inside `<project>/colmena/`.
pub struct ColmenaExecutor {
    work_dir: PathBuf,
}

/// Render the hive manifest. Exactly two substitution points: the absolute
/// module path and the target address. The manifest is regenerated from
/// scratch on every deploy, never diffed against a previous one.
fn render_hive(module_path: &Path, target_addr: &str) -> String {
    format!(
        r#"{{
  meta = {{
    nixpkgs = import <nixpkgs> {{ system = "x86_64-linux"; }};
  }};

  # Define the node
  target-node = {{ ... }}: {{
    imports = [ (import "{module}") ]; # Import the user's module
    deployment.targetHost = "{target}"; # Injected address
    deployment.targetUser = "root";
    deployment.buildOnTarget = true; # Build on remote instance, not locally
  }};
}}
"#,
        module = module_path.display(),
        target = target_addr
    )
}

impl ColmenaExecutor {
    pub fn new(workspace: &Workspace, project: &str) -> Result<Self> {
        let work_dir = workspace.colmena_dir(project);
        ensure_dir(&work_dir)?;
        Ok(Self { work_dir })
    }

    /// Write an ephemeral `hive.nix` with the target address injected.
    pub fn generate_hive(&self, module_path: &Path, target_addr: &str) -> Result<PathBuf> {
        // Nix imports need an absolute path regardless of colmena's cwd.
        let module_path = fs::canonicalize(module_path).map_err(|e| {
            InframanError::Filesystem(format!(
                "failed to resolve module path {}: {}",
                module_path.display(),
                e
            ))
        })?;

        let hive_path = self.work_dir.join(HIVE_FILE_NAME);
        fs::write(&hive_path, render_hive(&module_path, target_addr)).map_err(|e| {
            InframanError::Filesystem(format!(
                "failed to write hive {}: {}",
                hive_path.display(),
                e
            ))
        })?;
        Ok(hive_path)
    }

    /// Run `colmena apply` against a generated hive.
    pub fn apply(&self, hive_path: &Path, settings: &Settings) -> Result<()> {
        let args = apply_args(hive_path, settings);
        run_interactive("colmena", &args, &self.work_dir)
    }

    /// Evaluate the hive without deploying, to catch template or module
    /// errors before touching the target.
    pub fn validate(&self, hive_path: &Path) -> Result<()> {
        let args: Vec<OsString> = vec![
            "eval".into(),
            "-f".into(),
            hive_path.into(),
            "-E".into(),
            "{ nodes, ... }: nodes".into(),
        ];
        capture_stdout("colmena", &args, &self.work_dir).map(|_| ())
    }
}

/// Build the `colmena apply` argv.
///
/// An SSH config file takes precedence over an identity file; the identity
/// fallback also relaxes host key checking since freshly provisioned hosts
/// are unknown by definition.
fn apply_args(hive_path: &Path, settings: &Settings) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "apply".into(),
        "--on".into(),
        "target-node".into(),
        "-f".into(),
        hive_path.into(),
    ];

    if let Some(ssh_config) = &settings.ssh_config_path {
        args.push("--ssh-config".into());
        args.push(ssh_config.into());
    } else if let Some(ssh_key) = &settings.ssh_key_path {
        args.push("--ssh-option".into());
        args.push(format!("IdentityFile={}", ssh_key.display()).into());
        args.push("--ssh-option".into());
        args.push("StrictHostKeyChecking=accept-new".into());
    }

    args
}
