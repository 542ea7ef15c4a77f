// CLI argument parsing and definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "inframan")]
#[command(about = "Workspace manager bridging Terranix provisioning and Colmena deployment")]
#[command(version)]
#[command(after_help = "Environment variables:
  INFRA_CONFIG_JSON  Path to the Terranix-generated JSON config
  NIXOS_MODULE_PATH  Path to the NixOS configuration module
  PROJECT_NAME       Project folder under .inframan/ (default: \"default\")
  SSH_KEY_PATH       SSH identity file for deploy and ssh
  SSH_CONFIG_PATH    Full SSH config file; takes precedence over SSH_KEY_PATH")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Apply infrastructure using Terranix and Terraform
    #[command(long_about = "Apply infrastructure:
1. Reads the Terranix JSON config from INFRA_CONFIG_JSON
2. Stages it as .inframan/<project>/terraform/config.tf.json
3. Runs terraform init and terraform apply
4. Passes cloud credentials through from the environment")]
    Infra,

    /// Deploy the NixOS configuration using Colmena
    #[command(long_about = "Deploy the NixOS configuration:
1. Queries the target address from terraform output
2. Generates an ephemeral hive.nix with the address injected
3. Runs colmena apply against the target

Multi-instance projects need --instance to pick the target.")]
    Deploy {
        /// Instance to deploy to in a multi-instance project
        #[arg(long)]
        instance: Option<String>,
    },

    /// Destroy infrastructure using Terraform
    Destroy,

    /// SSH to an instance by project name
    #[command(long_about = "Connect to a provisioned instance.

For single-instance projects, use just the project name.
For multi-instance projects, use project/instance-name syntax.

Examples:
  # List all available instances
  inframan ssh --list

  # Connect to a single-instance project
  inframan ssh account1

  # Connect to a specific instance in a multi-instance project
  inframan ssh production/web-1

  # Connect with a specific user or identity file
  inframan ssh account1 --user nixos
  inframan ssh account1 --identity ~/.ssh/id_ed25519")]
    Ssh {
        /// Target as project[/instance]
        target: Option<String>,

        /// SSH user
        #[arg(short, long, default_value = "root")]
        user: String,

        /// Path to an SSH identity file
        #[arg(short, long)]
        identity: Option<PathBuf>,

        /// List all available instances
        #[arg(short, long)]
        list: bool,
    },
}
