//! The repair sequence: find the project, clear its caches and lock file,
//! then reinstall dependencies.

pub mod clean;
pub mod install;
pub mod locate;
pub mod lock;
pub mod package_manager;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use log::{info, warn};

use crate::config::RepairConfig;
use crate::error::RepairError;
use clean::{RemoveOutcome, clean_caches};
use install::{InstallReport, Installer};
use locate::{SearchPlan, locate_project};
use lock::remove_lock_file;

#[derive(Debug, Clone)]
pub struct RepairSummary {
    pub root: PathBuf,
    pub removed: Vec<(String, RemoveOutcome)>,
    pub lock_removed: bool,
    pub install: InstallReport,
}

/// Run one repair. Nothing is touched unless a project directory is found.
pub fn run(config: &RepairConfig, explicit: Option<&Path>) -> Result<RepairSummary> {
    let plan = SearchPlan {
        explicit,
        candidates: &config.candidates,
        scan_root: &config.scan_root,
        manifest: &config.manifest,
    };
    let Some(project) = locate_project(&plan) else {
        warn!(
            "searched {} candidate(s) and {} for a directory containing {}",
            config.candidates.len(),
            config.scan_root.display(),
            config.manifest
        );
        return Err(RepairError::ProjectNotFound.into());
    };
    let root = project.root;
    println!("Found project at: {}", root.display());
    info!("project located via {:?}", project.source);

    let removed = clean_caches(&root, &config.cache_dirs);

    let lock_removed = if config.keep_lock {
        info!("keeping {}", config.lock_file_name());
        false
    } else {
        remove_lock_file(&root, config.lock_file_name())?
    };

    let installer = Installer::for_manager(
        config.package_manager,
        Duration::from_secs(config.timeout_secs),
        config.output_tail,
    );
    println!("Running {}...", installer.render());
    let install = installer.run(&root)?;
    println!("{}", install.render());

    if config.strict {
        if let Some(code) = install.failure_code() {
            return Err(RepairError::InstallFailed {
                program: installer.render(),
                code,
            }
            .into());
        }
    }

    Ok(RepairSummary {
        root,
        removed,
        lock_removed,
        install,
    })
}
