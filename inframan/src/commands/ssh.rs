use inframan_config::Settings;
use inframan_core::command::{handoff, require_tool};
use inframan_core::error::Result;
use inframan_core::inframan_println;
use inframan_core::workspace::Workspace;
use inframan_provider::instance;
use std::ffi::OsString;
use std::path::Path;

pub fn run(
    workspace: &Workspace,
    settings: &Settings,
    target: Option<&str>,
    user: &str,
    identity: Option<&Path>,
    list: bool,
) -> Result<()> {
    // No target behaves like --list: show what there is to connect to.
    match target {
        Some(target) if !list => connect(workspace, settings, target, user, identity),
        _ => list_instances(workspace),
    }
}

/// Best-effort listing of every instance across all projects.
fn list_instances(workspace: &Workspace) -> Result<()> {
    let instances = instance::list_all(workspace)?;

    if instances.is_empty() {
        inframan_println!("No instances found.");
        inframan_println!("Run 'inframan infra' to provision infrastructure first.");
        return Ok(());
    }

    inframan_println!("Available instances:");
    inframan_println!();
    for inst in &instances {
        inframan_println!("  {:<30} {}", inst.full_name(), inst.public_ip);
    }
    inframan_println!();
    inframan_println!("Connect with: inframan ssh <project[/instance]>");
    Ok(())
}

fn connect(
    workspace: &Workspace,
    settings: &Settings,
    target: &str,
    user: &str,
    identity: Option<&Path>,
) -> Result<()> {
    let inst = instance::resolve(workspace, target)?;

    inframan_println!(
        "Connecting to {} ({}) as {}...",
        inst.full_name(),
        inst.public_ip,
        user
    );

    let args = ssh_args(settings, identity, user, &inst.public_ip);

    let ssh = require_tool("ssh")?;
    let code = handoff(&ssh, &args)?;

    // The session's exit status becomes our own.
    std::process::exit(code);
}

/// Build the ssh argv.
///
/// A full SSH config file takes precedence; the --identity flag beats the
/// SSH_KEY_PATH fallback. Convenience options for freshly provisioned hosts
/// are skipped when the user brings their own config.
fn ssh_args(
    settings: &Settings,
    identity: Option<&Path>,
    user: &str,
    public_ip: &str,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();
    if let Some(config) = &settings.ssh_config_path {
        args.push("-F".into());
        args.push(config.into());
    } else if let Some(identity) = identity {
        let expanded = shellexpand::tilde(&identity.to_string_lossy()).into_owned();
        args.push("-i".into());
        args.push(expanded.into());
    } else if let Some(key) = &settings.ssh_key_path {
        args.push("-i".into());
        args.push(key.into());
    }

    if settings.ssh_config_path.is_none() {
        for opt in [
            "-o",
            "StrictHostKeyChecking=accept-new",
            "-o",
            "UserKnownHostsFile=/dev/null",
            "-o",
            "LogLevel=ERROR",
        ] {
            args.push(opt.into());
        }
    }

    args.push(format!("{}@{}", user, public_ip).into());
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn identity_flag_beats_key_env_fallback() {
        let settings = Settings {
            ssh_key_path: Some(PathBuf::from("/keys/fallback")),
            ..Default::default()
        };
        let args = ssh_args(&settings, Some(Path::new("/keys/explicit")), "root", "1.2.3.4");
        assert!(args.contains(&OsString::from("/keys/explicit")));
        assert!(!args.contains(&OsString::from("/keys/fallback")));
        assert_eq!(args.last().unwrap(), &OsString::from("root@1.2.3.4"));
    }

    #[test]
    fn ssh_config_suppresses_convenience_options() {
        let settings = Settings {
            ssh_config_path: Some(PathBuf::from("/etc/ssh_config")),
            ssh_key_path: Some(PathBuf::from("/keys/fallback")),
            ..Default::default()
        };
        let args = ssh_args(&settings, None, "nixos", "1.2.3.4");
        assert_eq!(args[0], OsString::from("-F"));
        assert!(!args.contains(&OsString::from("-o")));
        assert!(!args.contains(&OsString::from("-i")));
    }

    #[test]
    fn bare_key_env_is_used_with_host_key_relaxation() {
        let settings = Settings {
            ssh_key_path: Some(PathBuf::from("/keys/fallback")),
            ..Default::default()
        };
        let args = ssh_args(&settings, None, "root", "1.2.3.4");
        assert!(args.contains(&OsString::from("/keys/fallback")));
        assert!(args.contains(&OsString::from("StrictHostKeyChecking=accept-new")));
    }
}
