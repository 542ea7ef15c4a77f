//! Project workspace layout.
//!
//! All state lives under `<cwd>/.inframan/<project>/`, with one subdirectory
//! per external tool. There is no project registry beyond the filesystem:
//! a directory under the root is a project once terraform has initialized in
//! it or a compiled config has been staged into it.

use crate::error::{InframanError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Root directory for all inframan-generated files, relative to the cwd.
pub const INFRAMAN_DIR: &str = ".inframan";

/// Per-project subdirectory holding terraform state and config.
pub const TERRAFORM_SUBDIR: &str = "terraform";

/// Per-project subdirectory holding generated colmena hive files.
pub const COLMENA_SUBDIR: &str = "colmena";

/// File name of the staged terraform config artifact.
pub const CONFIG_FILE_NAME: &str = "config.tf.json";

/// File name of the generated colmena hive.
pub const HIVE_FILE_NAME: &str = "hive.nix";

/// Directory created by `terraform init`; presence marks an initialized project.
pub const TERRAFORM_INIT_MARKER: &str = ".terraform";

/// Project name used when none is configured.
pub const DEFAULT_PROJECT_NAME: &str = "default";

/// Handle to the on-disk workspace rooted at `.inframan/`.
///
/// Path computation is pure: the same root and project name always yield the
/// same paths. Only the `ensure_*` methods touch the filesystem, and they
/// only ever create directories.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Locate the workspace under the current working directory.
    pub fn locate() -> Result<Self> {
        let cwd = std::env::current_dir().map_err(|e| {
            InframanError::Environment(format!("failed to determine working directory: {}", e))
        })?;
        Ok(Self {
            root: cwd.join(INFRAMAN_DIR),
        })
    }

    /// Open a workspace at an explicit root. Used by tests and tooling.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<project>`. An empty name falls back to the default project,
    /// it is never rejected.
    pub fn project_dir(&self, name: &str) -> PathBuf {
        self.root.join(canonical_name(name))
    }

    /// `<root>/<project>/terraform`
    pub fn terraform_dir(&self, name: &str) -> PathBuf {
        self.project_dir(name).join(TERRAFORM_SUBDIR)
    }

    /// `<root>/<project>/colmena`
    pub fn colmena_dir(&self, name: &str) -> PathBuf {
        self.project_dir(name).join(COLMENA_SUBDIR)
    }

    /// Path of the staged `config.tf.json` for a project.
    pub fn config_path(&self, name: &str) -> PathBuf {
        self.terraform_dir(name).join(CONFIG_FILE_NAME)
    }

    /// Path of the generated `hive.nix` for a project.
    pub fn hive_path(&self, name: &str) -> PathBuf {
        self.colmena_dir(name).join(HIVE_FILE_NAME)
    }

    /// A project counts as initialized once `terraform init` has run in it
    /// (works with remote backends) or a config artifact has been staged.
    pub fn is_initialized(&self, name: &str) -> bool {
        let terraform_dir = self.terraform_dir(name);
        terraform_dir.join(TERRAFORM_INIT_MARKER).is_dir()
            || terraform_dir.join(CONFIG_FILE_NAME).is_file()
    }

    /// List initialized projects under the root, in no particular order.
    /// A missing root means no projects yet, not an error.
    pub fn list_projects(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.root).map_err(|e| {
            InframanError::Filesystem(format!(
                "failed to read workspace root {}: {}",
                self.root.display(),
                e
            ))
        })?;

        let mut projects = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                InframanError::Filesystem(format!(
                    "failed to read workspace root {}: {}",
                    self.root.display(),
                    e
                ))
            })?;
            if !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if self.is_initialized(&name) {
                projects.push(name);
            }
        }

        Ok(projects)
    }

    /// Create the full directory structure for a project.
    pub fn ensure_project(&self, name: &str) -> Result<()> {
        ensure_dir(&self.terraform_dir(name))?;
        ensure_dir(&self.colmena_dir(name))
    }
}

fn canonical_name(name: &str) -> &str {
    if name.is_empty() {
        DEFAULT_PROJECT_NAME
    } else {
        name
    }
}

/// Recursively create a directory. Idempotent: an existing directory is fine.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| {
        InframanError::Filesystem(format!("failed to create directory {}: {}", path.display(), e))
    })
}
