use inframan_config::Settings;
use inframan_core::command::require_tool;
use inframan_core::error::Result;
use inframan_core::inframan_println;
use inframan_core::workspace::Workspace;
use inframan_provider::{TerraformExecutor, TerranixExecutor};

/// Stage the compiled config and bring the infrastructure up.
pub fn run(workspace: &Workspace, settings: &Settings) -> Result<()> {
    let config = settings.require_infra_config()?;
    require_tool("terraform")?;

    inframan_println!("Setting up infrastructure workspace...");
    workspace.ensure_project(&settings.project_name)?;
    let terranix = TerranixExecutor::new(workspace, &settings.project_name)?;
    terranix.build_from_config(config)?;

    let terraform = TerraformExecutor::new(workspace, &settings.project_name)?;

    inframan_println!("Initializing Terraform...");
    terraform.init()?;

    inframan_println!("Applying infrastructure...");
    terraform.apply()?;

    inframan_println!("Infrastructure applied successfully!");
    Ok(())
}
