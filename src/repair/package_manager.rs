use anyhow::{Result, bail};
use clap::ValueEnum;
use serde::Deserialize;

pub const PM_ENV: &str = "FIX_DEPS_PM";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl PackageManager {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "npm" => Some(Self::Npm),
            "pnpm" => Some(Self::Pnpm),
            "yarn" => Some(Self::Yarn),
            "bun" => Some(Self::Bun),
            _ => None,
        }
    }

    /// Both the display name and the program that gets spawned.
    pub fn name(self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Pnpm => "pnpm",
            Self::Yarn => "yarn",
            Self::Bun => "bun",
        }
    }

    /// Lock file this manager writes next to the manifest.
    pub fn lockfile(self) -> &'static str {
        match self {
            Self::Npm => "package-lock.json",
            Self::Pnpm => "pnpm-lock.yaml",
            Self::Yarn => "yarn.lock",
            Self::Bun => "bun.lockb",
        }
    }

    pub fn install_args(self) -> Vec<String> {
        vec!["install".to_string()]
    }
}

/// Picks the manager from, in order: the command line, `FIX_DEPS_PM`, the config file.
pub fn resolve_package_manager(
    cli_choice: Option<PackageManager>,
    env_override: Option<&str>,
    configured: PackageManager,
) -> Result<PackageManager> {
    if let Some(pm) = cli_choice {
        return Ok(pm);
    }

    if let Some(raw) = env_override {
        let Some(pm) = PackageManager::parse(raw) else {
            bail!(
                "Unsupported {PM_ENV} value `{}`. Supported values: npm, pnpm, yarn, bun.",
                raw
            );
        };
        return Ok(pm);
    }

    Ok(configured)
}

pub fn env_override() -> Option<String> {
    std::env::var(PM_ENV).ok().filter(|v| !v.trim().is_empty())
}
