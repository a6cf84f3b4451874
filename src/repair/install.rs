use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info};
use process_control::{ChildExt, Control};

use crate::error::RepairError;
use crate::repair::package_manager::PackageManager;
use crate::utils::text::tail_chars;

/// An install command plus the limits it runs under.
#[derive(Debug, Clone)]
pub struct Installer {
    program: OsString,
    args: Vec<String>,
    timeout: Duration,
    output_tail: usize,
}

impl Installer {
    pub fn for_manager(pm: PackageManager, timeout: Duration, output_tail: usize) -> Self {
        Self::with_program(pm.name(), pm.install_args(), timeout, output_tail)
    }

    pub fn with_program(
        program: impl Into<OsString>,
        args: Vec<String>,
        timeout: Duration,
        output_tail: usize,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
            output_tail,
        }
    }

    pub fn render(&self) -> String {
        let mut rendered = self.program.to_string_lossy().into_owned();
        for arg in &self.args {
            rendered.push(' ');
            rendered.push_str(arg);
        }
        rendered
    }

    /// Run the install in `dir`, capturing both streams.
    ///
    /// A non-zero exit is returned as a normal report. Exceeding the time
    /// limit kills the child and yields [`RepairError::InstallTimedOut`].
    pub fn run(&self, dir: &Path) -> Result<InstallReport> {
        debug!("spawning `{}` in {}", self.render(), dir.display());
        let child = Command::new(&self.program)
            .args(&self.args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("spawning {}", self.program.to_string_lossy()))?;

        let output = child
            .controlled_with_output()
            .time_limit(self.timeout)
            .terminate_for_timeout()
            .wait()
            .with_context(|| format!("waiting for `{}`", self.render()))?;

        let Some(output) = output else {
            return Err(RepairError::InstallTimedOut {
                program: self.render(),
                timeout: self.timeout,
            }
            .into());
        };

        let report = InstallReport {
            stdout: tail_chars(&String::from_utf8_lossy(&output.stdout), self.output_tail).to_string(),
            stderr: tail_chars(&String::from_utf8_lossy(&output.stderr), self.output_tail).to_string(),
            code: surfaced_code(output.status),
        };
        info!("`{}` finished with code {:?}", self.render(), report.code);
        Ok(report)
    }
}

/// Exit code, or the negated signal number when the installer was killed.
#[cfg(unix)]
fn surfaced_code(status: process_control::ExitStatus) -> Option<i64> {
    status
        .code()
        .or_else(|| status.signal().map(|sig| -i64::from(sig)))
}

#[cfg(not(unix))]
fn surfaced_code(status: process_control::ExitStatus) -> Option<i64> {
    status.code()
}

/// Captured, already-truncated result of an install run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub stdout: String,
    pub stderr: String,
    /// Negative for a signal on unix; `None` only if neither is known.
    pub code: Option<i64>,
}

impl InstallReport {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Exit code to propagate in strict mode.
    pub fn failure_code(&self) -> Option<i32> {
        match self.code {
            Some(0) => None,
            Some(code) => Some(i32::try_from(code).ok().filter(|c| *c > 0).unwrap_or(1)),
            None => Some(1),
        }
    }

    pub fn render(&self) -> String {
        let mut out = format!("STDOUT: {}\n", self.stdout);
        if !self.stderr.is_empty() {
            out.push_str(&format!("STDERR: {}\n", self.stderr));
        }
        match self.code {
            Some(code) => out.push_str(&format!("Return code: {code}")),
            None => out.push_str("Return code: unknown"),
        }
        out
    }
}
