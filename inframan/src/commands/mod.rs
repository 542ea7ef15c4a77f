// Command handlers for workspace operations

use crate::cli::{Args, Command};
use inframan_config::Settings;
use inframan_core::error::Result;
use inframan_core::workspace::Workspace;
use tracing::debug;

// Individual command modules
pub mod deploy;
pub mod destroy;
pub mod infra;
pub mod ssh;

/// Main command dispatcher
pub fn execute_command(args: Args) -> Result<()> {
    let settings = Settings::from_env();
    let workspace = Workspace::locate()?;

    match args.command {
        Command::Infra => {
            debug!("handling infra command");
            infra::run(&workspace, &settings)
        }
        Command::Deploy { instance } => {
            debug!("handling deploy command");
            deploy::run(&workspace, &settings, instance.as_deref())
        }
        Command::Destroy => {
            debug!("handling destroy command");
            destroy::run(&workspace, &settings)
        }
        Command::Ssh {
            target,
            user,
            identity,
            list,
        } => {
            debug!("handling ssh command");
            ssh::run(
                &workspace,
                &settings,
                target.as_deref(),
                &user,
                identity.as_deref(),
                list,
            )
        }
    }
}
