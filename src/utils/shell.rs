use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};

/// Delete `path` through the platform's shell-level recursive delete.
pub fn force_remove(path: &Path) -> Result<()> {
    let mut cmd = force_remove_command(path);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::inherit());

    let status = cmd
        .status()
        .with_context(|| format!("running forced delete of {}", path.display()))?;

    if !status.success() {
        bail!(
            "forced delete of {} exited with code {}",
            path.display(),
            status.code().unwrap_or_default()
        );
    }
    Ok(())
}

#[cfg(windows)]
fn force_remove_command(path: &Path) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "rmdir", "/S", "/Q"]);
    cmd.arg(path);
    cmd
}

#[cfg(not(windows))]
fn force_remove_command(path: &Path) -> Command {
    let mut cmd = Command::new("rm");
    cmd.arg("-rf");
    cmd.arg(path);
    cmd
}
