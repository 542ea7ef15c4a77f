//! Resolution of `project[/instance]` targets to provisioned instances.

use crate::state::Instance;
use crate::terraform;
use inframan_core::error::{InframanError, Result};
use inframan_core::workspace::Workspace;
use tracing::debug;

/// Split a target on the first `/`. No slash means the whole string is the
/// project and the instance part is empty.
///
/// `"account1"` → `("account1", "")`, `"prod/web-1"` → `("prod", "web-1")`.
pub fn parse_target(target: &str) -> (&str, &str) {
    match target.split_once('/') {
        Some((project, instance)) => (project, instance),
        None => (target, ""),
    }
}

/// Enumerate instance names for error messages: sorted for reproducible
/// output, with the literal `(default)` standing in for the unnamed legacy
/// slot.
fn format_instance_names(instances: &[Instance]) -> String {
    let mut names: Vec<&str> = instances
        .iter()
        .map(|inst| {
            if inst.name.is_empty() {
                "(default)"
            } else {
                inst.name.as_str()
            }
        })
        .collect();
    names.sort_unstable();
    format!("[{}]", names.join(", "))
}

/// Pick one instance out of a project's resolved set.
///
/// An empty `name` means "the only instance": anything else in the set is
/// ambiguous and the caller gets the full sorted name list to choose from.
pub fn select_instance(
    mut instances: Vec<Instance>,
    project: &str,
    name: &str,
) -> Result<Instance> {
    if name.is_empty() {
        return match instances.len() {
            0 => Err(InframanError::NotFound(format!(
                "no instances found for project \"{}\"",
                project
            ))),
            1 => Ok(instances.remove(0)),
            n => Err(InframanError::Ambiguous(format!(
                "project \"{}\" has {} instances, specify one: {}",
                project,
                n,
                format_instance_names(&instances)
            ))),
        };
    }

    let available = format_instance_names(&instances);
    instances
        .into_iter()
        .find(|inst| inst.name == name)
        .ok_or_else(|| {
            InframanError::NotFound(format!(
                "instance \"{}\" not found in project \"{}\", available: {}",
                name, project, available
            ))
        })
}

/// Resolve a target against the workspace, fetching instances through the
/// supplied query. Fetch failures propagate unchanged; there are no partial
/// results here.
pub fn resolve_with<F>(workspace: &Workspace, target: &str, fetch: F) -> Result<Instance>
where
    F: Fn(&str) -> Result<Vec<Instance>>,
{
    let (project, instance) = parse_target(target);

    let known = workspace.list_projects()?;
    if !known.iter().any(|p| p == project) {
        return Err(InframanError::NotFound(format!(
            "project \"{}\" does not exist",
            project
        )));
    }

    let instances = fetch(project)?;
    select_instance(instances, project, instance)
}

/// Best-effort listing across all known projects.
///
/// A project whose output query or parse fails is skipped rather than
/// failing the whole listing; one broken project must not hide the healthy
/// ones. Skips are logged at debug level so `LOG_LEVEL=debug` surfaces the
/// reasons.
pub fn list_all_with<F>(workspace: &Workspace, fetch: F) -> Result<Vec<Instance>>
where
    F: Fn(&str) -> Result<Vec<Instance>>,
{
    let mut all = Vec::new();
    for project in workspace.list_projects()? {
        match fetch(&project) {
            Ok(mut instances) => all.append(&mut instances),
            Err(e) => {
                debug!(project = %project, error = %e, "skipping project with unreadable state")
            }
        }
    }
    Ok(all)
}

/// Resolve a `project[/instance]` target by querying terraform state.
pub fn resolve(workspace: &Workspace, target: &str) -> Result<Instance> {
    resolve_with(workspace, target, |project| {
        terraform::project_instances(workspace, project)
    })
}

/// List every instance across all known projects, best effort.
pub fn list_all(workspace: &Workspace) -> Result<Vec<Instance>> {
    list_all_with(workspace, |project| {
        terraform::project_instances(workspace, project)
    })
}
