//! Terraform invocation against a project's workspace directory.

use crate::state::{self, Instance};
use inframan_core::command::{capture_stdout, run_interactive};
use inframan_core::error::{InframanError, Result};
use inframan_core::inframan_println;
use inframan_core::workspace::{ensure_dir, Workspace, CONFIG_FILE_NAME, TERRAFORM_INIT_MARKER};
use std::fs;
use std::path::{Path, PathBuf};

/// Runs terraform commands inside `<project>/terraform/`.
///
/// Terraform inherits stdio for the interactive commands (apply prompts for
/// confirmation) and the full parent environment, which carries cloud
/// provider credentials through untouched.
pub struct TerraformExecutor {
    work_dir: PathBuf,
}

impl TerraformExecutor {
    /// Create an executor for a project, creating its work dir if needed.
    pub fn new(workspace: &Workspace, project: &str) -> Result<Self> {
        let work_dir = workspace.terraform_dir(project);
        ensure_dir(&work_dir)?;
        Ok(Self { work_dir })
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Copy a pre-compiled config artifact into the work dir as
    /// `config.tf.json`. Overwrites the previous artifact; the staged copy
    /// is regenerated input, not state.
    pub fn stage_config(&self, source: &Path) -> Result<PathBuf> {
        let data = fs::read(source).map_err(|e| {
            InframanError::Filesystem(format!(
                "failed to read config file {}: {}",
                source.display(),
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

    pub fn init(&self) -> Result<()> {
        run_interactive("terraform", &["init"], &self.work_dir)
    }

    pub fn apply(&self) -> Result<()> {
        run_interactive("terraform", &["apply"], &self.work_dir)
    }

    pub fn destroy(&self) -> Result<()> {
        run_interactive("terraform", &["destroy"], &self.work_dir)
    }

    pub fn is_initialized(&self) -> bool {
        self.work_dir.join(TERRAFORM_INIT_MARKER).is_dir()
    }

    /// Run `terraform init` unless it already ran. Commands that only read
    /// state (output, destroy) still need init when the backend is remote
    /// and no local state was checked in.
    pub fn ensure_init(&self) -> Result<()> {
        if self.is_initialized() {
            return Ok(());
        }
        inframan_println!("Initializing Terraform in {}...", self.work_dir.display());
        self.init()
    }

    /// Capture the raw `terraform output -json` snapshot.
    pub fn output(&self) -> Result<Vec<u8>> {
        self.ensure_init()?;
        capture_stdout("terraform", &["output", "-json"], &self.work_dir)
    }
}

/// Query and parse the instance set of a single project.
///
/// The instance set is ephemeral: every call re-runs the output query and
/// re-parses it, nothing is cached across invocations.
pub fn project_instances(workspace: &Workspace, project: &str) -> Result<Vec<Instance>> {
    let work_dir = workspace.terraform_dir(project);
    if !work_dir.is_dir() {
        return Err(InframanError::NotFound(format!(
            "project \"{}\" does not exist",
            project
        )));
    }

    let executor = TerraformExecutor { work_dir };
    let raw = executor.output()?;
    state::parse_instances(&raw, project)
}
