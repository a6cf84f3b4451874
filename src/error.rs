use std::time::Duration;

use thiserror::Error;

/// Exit code used when the installer is killed for running too long,
/// the same code coreutils `timeout` reports.
pub const TIMEOUT_EXIT_CODE: i32 = 124;

/// Failures that decide the process exit code. Anything else ends the run
/// with code 1.
#[derive(Debug, Error)]
pub enum RepairError {
    #[error("Could not find project directory")]
    ProjectNotFound,
    #[error("`{program}` did not finish within {}s and was terminated", .timeout.as_secs())]
    InstallTimedOut { program: String, timeout: Duration },
    #[error("`{program}` exited with code {code}")]
    InstallFailed { program: String, code: i32 },
}

impl RepairError {
    pub fn exit_code(&self) -> i32 {
        match self {
            RepairError::ProjectNotFound => 1,
            RepairError::InstallTimedOut { .. } => TIMEOUT_EXIT_CODE,
            RepairError::InstallFailed { code, .. } => *code,
        }
    }
}

pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<RepairError>()
        .map(RepairError::exit_code)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_errors_map_to_their_codes() {
        let timeout = anyhow::Error::new(RepairError::InstallTimedOut {
            program: "npm".to_string(),
            timeout: Duration::from_secs(180),
        });
        assert_eq!(exit_code_for(&timeout), 124);
        assert!(timeout.to_string().contains("180s"));

        let failed = anyhow::Error::new(RepairError::InstallFailed {
            program: "npm".to_string(),
            code: 7,
        });
        assert_eq!(exit_code_for(&failed), 7);
        assert_eq!(exit_code_for(&anyhow::Error::new(RepairError::ProjectNotFound)), 1);
    }

    #[test]
    fn context_does_not_hide_the_typed_error() {
        let err = anyhow::Error::new(RepairError::InstallTimedOut {
            program: "npm".to_string(),
            timeout: Duration::from_secs(1),
        })
        .context("reinstalling dependencies");
        assert_eq!(exit_code_for(&err), 124);
    }

    #[test]
    fn untyped_errors_exit_with_one() {
        assert_eq!(exit_code_for(&anyhow::anyhow!("boom")), 1);
    }
}
