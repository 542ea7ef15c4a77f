use inframan_config::Settings;
use inframan_core::command::require_tool;
use inframan_core::error::Result;
use inframan_core::inframan_println;
use inframan_core::workspace::Workspace;
use inframan_provider::TerraformExecutor;

/// Tear down everything terraform provisioned for the project.
pub fn run(workspace: &Workspace, settings: &Settings) -> Result<()> {
    require_tool("terraform")?;
    let terraform = TerraformExecutor::new(workspace, &settings.project_name)?;

    inframan_println!("Destroying infrastructure...");
    terraform.ensure_init()?;
    terraform.destroy()?;

    inframan_println!("Infrastructure destroyed successfully!");
    Ok(())
}
