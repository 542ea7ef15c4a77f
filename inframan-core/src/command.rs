//! Subprocess helpers for the external tools inframan wraps.
//!
//! Every call is blocking and inherits the parent environment, so tool
//! credentials (e.g. cloud provider keys) pass straight through. There are
//! no timeouts: the wrapped tools own their responsiveness.

use crate::error::{InframanError, Result};
use duct::cmd;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use tracing::debug;
use which::which;

/// Resolve a required external tool on PATH.
pub fn require_tool(name: &str) -> Result<PathBuf> {
    which(name).map_err(|_| {
        InframanError::Environment(format!(
            "required tool '{}' not found in PATH",
            name
        ))
    })
}

/// Run a command with inherited stdio in the given directory.
///
/// Interactive flows (terraform apply prompting for confirmation, colmena
/// streaming build output) go through here; the user talks to the tool
/// directly and we only translate the exit status.
pub fn run_interactive<A: AsRef<OsStr>>(program: &str, args: &[A], dir: &Path) -> Result<()> {
    debug!(program, dir = %dir.display(), "running interactive command");
    let output = cmd(program, args)
        .dir(dir)
        .unchecked()
        .run()
        .map_err(|e| InframanError::Command(format!("failed to run {}: {}", program, e)))?;

    if output.status.success() {
        Ok(())
    } else {
        Err(InframanError::Command(format!(
            "{} {}",
            program,
            describe_status(output.status)
        )))
    }
}

/// Run a command capturing stdout, folding captured stderr into the error on
/// a non-zero exit.
pub fn capture_stdout<A: AsRef<OsStr>>(program: &str, args: &[A], dir: &Path) -> Result<Vec<u8>> {
    debug!(program, dir = %dir.display(), "capturing command output");
    let output = cmd(program, args)
        .dir(dir)
        .stdout_capture()
        .stderr_capture()
        .unchecked()
        .run()
        .map_err(|e| InframanError::Command(format!("failed to run {}: {}", program, e)))?;

    if output.status.success() {
        Ok(output.stdout)
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        if stderr.is_empty() {
            Err(InframanError::Command(format!(
                "{} {}",
                program,
                describe_status(output.status)
            )))
        } else {
            Err(InframanError::Command(format!(
                "{} {}: {}",
                program,
                describe_status(output.status),
                stderr
            )))
        }
    }
}

/// Hand the terminal over to a subprocess and report its exit status back.
///
/// The caller is expected to exit the process with the returned code, which
/// makes the child's exit status our own. This replaces exec-style process
/// replacement while keeping normal Rust cleanup on the way out.
pub fn handoff<A: AsRef<OsStr>>(program: &Path, args: &[A]) -> Result<i32> {
    debug!(program = %program.display(), "handing terminal over to subprocess");
    let status = std::process::Command::new(program)
        .args(args)
        .status()
        .map_err(|e| {
            InframanError::Command(format!("failed to run {}: {}", program.display(), e))
        })?;

    // Terminated by signal on unix leaves no code; treat it as failure.
    Ok(status.code().unwrap_or(1))
}

fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exited with status {}", code),
        None => "terminated by signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_stdout_returns_output() {
        let out = capture_stdout("echo", &["hello"], Path::new(".")).unwrap();
        assert_eq!(String::from_utf8_lossy(&out).trim(), "hello");
    }

    #[test]
    fn capture_stdout_folds_stderr_into_error() {
        let err = capture_stdout("sh", &["-c", "echo oops >&2; exit 3"], Path::new("."))
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("status 3"), "unexpected message: {}", msg);
        assert!(msg.contains("oops"), "unexpected message: {}", msg);
    }

    #[test]
    fn run_interactive_reports_exit_status() {
        assert!(run_interactive("true", &[] as &[&str], Path::new(".")).is_ok());
        let err = run_interactive("false", &[] as &[&str], Path::new(".")).unwrap_err();
        assert!(err.to_string().contains("exited with status 1"));
    }

    #[test]
    fn handoff_propagates_exit_code() {
        let sh = require_tool("sh").unwrap();
        let code = handoff(&sh, &["-c", "exit 7"]).unwrap();
        assert_eq!(code, 7);
    }

    #[test]
    fn require_tool_rejects_missing_binary() {
        assert!(require_tool("definitely-not-a-real-tool-0000").is_err());
    }
}
