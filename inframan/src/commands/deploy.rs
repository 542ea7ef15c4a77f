use inframan_config::Settings;
use inframan_core::command::require_tool;
use inframan_core::error::Result;
use inframan_core::inframan_println;
use inframan_core::workspace::Workspace;
use inframan_provider::{instance, ColmenaExecutor};

/// Resolve the target address from terraform state, regenerate the hive and
/// apply it with colmena.
pub fn run(workspace: &Workspace, settings: &Settings, instance_name: Option<&str>) -> Result<()> {
    let module = settings.require_nixos_module()?;
    require_tool("terraform")?;
    require_tool("colmena")?;

    inframan_println!("Fetching infrastructure state...");
    let target = match instance_name {
        Some(name) => format!("{}/{}", settings.project_name, name),
        None => settings.project_name.clone(),
    };
    let inst = instance::resolve(workspace, &target)?;
    inframan_println!("Target address: {}", inst.public_ip);

    let colmena = ColmenaExecutor::new(workspace, &settings.project_name)?;

    inframan_println!("Generating Colmena hive configuration...");
    let hive = colmena.generate_hive(module, &inst.public_ip)?;
    inframan_println!("Generated hive at: {}", hive.display());

    inframan_println!("Validating hive...");
    colmena.validate(&hive)?;

    inframan_println!("Deploying with Colmena...");
    colmena.apply(&hive, settings)?;

    inframan_println!("Deployment completed successfully!");
    Ok(())
}
