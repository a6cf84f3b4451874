use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, info};

use crate::config::{RepairConfig, load_repair_config};
use crate::error::exit_code_for;
use crate::repair::{self, package_manager};
use crate::repair::package_manager::PackageManager;

/// Root CLI for fix-deps
#[derive(Parser, Debug)]
#[command(name = "fix-deps", version)]
#[command(about = "Reset a web project's dependency caches and reinstall its packages")]
pub struct Cli {
    /// Project directory to repair; skips the search
    #[arg(long, value_name = "DIR")]
    pub project: Option<PathBuf>,
    /// Candidate project directory, checked in order (repeatable, replaces the built-in list)
    #[arg(long = "candidate", value_name = "DIR")]
    pub candidates: Vec<PathBuf>,
    /// Directory whose subdirectories are scanned when no candidate exists
    #[arg(long, value_name = "DIR")]
    pub scan_root: Option<PathBuf>,
    /// File that marks a project root during the scan
    #[arg(long, value_name = "NAME")]
    pub manifest: Option<String>,
    /// Package manager used for the reinstall
    #[arg(long, value_enum, value_name = "NAME")]
    pub package_manager: Option<PackageManager>,
    /// Seconds the install may run before it is killed
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
    /// Leave the lock file in place
    #[arg(long)]
    pub keep_lock: bool,
    /// Exit with the installer's code when the install fails
    #[arg(long)]
    pub strict: bool,
    /// Read settings from this file instead of fix-deps.{yml,yaml,toml}
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Print debug diagnostics
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Layer flags and `FIX_DEPS_PM` over the loaded config.
    pub fn apply(&self, mut config: RepairConfig, env_pm: Option<&str>) -> Result<RepairConfig> {
        if !self.candidates.is_empty() {
            config.candidates = self.candidates.clone();
        }
        if let Some(scan_root) = &self.scan_root {
            config.scan_root = scan_root.clone();
        }
        if let Some(manifest) = &self.manifest {
            config.manifest = manifest.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        config.package_manager = package_manager::resolve_package_manager(
            self.package_manager,
            env_pm,
            config.package_manager,
        )?;
        config.keep_lock |= self.keep_lock;
        config.strict |= self.strict;
        Ok(config)
    }
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    builder.format_timestamp(None).format_target(false);
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    } else if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(LevelFilter::Warn);
    }
    builder.init();
}

fn execute(cli: &Cli) -> Result<()> {
    let loaded = load_repair_config(cli.config.as_deref())?;
    if let Some(path) = &loaded.path {
        info!("using config {}", path.display());
    }
    let env_pm = package_manager::env_override();
    let config = cli.apply(loaded.data, env_pm.as_deref())?;

    let summary = repair::run(&config, cli.project.as_deref())?;
    info!(
        "repaired {} ({} cache dir(s) checked, lock removed: {}, install ok: {})",
        summary.root.display(),
        summary.removed.len(),
        summary.lock_removed,
        summary.install.success()
    );
    Ok(())
}

/// Dispatch after parse
pub fn run() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = execute(&cli) {
        eprintln!("error: {e:#}");
        std::process::exit(exit_code_for(&e));
    }
}
