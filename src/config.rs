use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::repair::package_manager::PackageManager;

const CONFIG_CANDIDATES: &[(&str, ConfigFormat)] = &[
    ("fix-deps.yml", ConfigFormat::Yaml),
    ("fix-deps.yaml", ConfigFormat::Yaml),
    ("fix-deps.toml", ConfigFormat::Toml),
];

const DEFAULT_CANDIDATES: &[&str] = &["/vercel/share/v0-project", "/vercel/share/v0-next-shadcn"];
const DEFAULT_SCAN_ROOT: &str = "/vercel/share";

#[derive(Debug, Clone, Copy)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Everything a repair run needs. Every field has a default, so a config
/// file only has to name what it changes.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RepairConfig {
    pub candidates: Vec<PathBuf>,
    pub scan_root: PathBuf,
    pub manifest: String,
    pub cache_dirs: Vec<String>,
    pub package_manager: PackageManager,
    /// Overrides the package manager's own lock file name.
    pub lock_file: Option<String>,
    pub timeout_secs: u64,
    pub output_tail: usize,
    pub keep_lock: bool,
    pub strict: bool,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            candidates: DEFAULT_CANDIDATES.iter().map(PathBuf::from).collect(),
            scan_root: PathBuf::from(DEFAULT_SCAN_ROOT),
            manifest: "package.json".to_string(),
            cache_dirs: vec!["node_modules".to_string(), ".next".to_string()],
            package_manager: PackageManager::Npm,
            lock_file: None,
            timeout_secs: 180,
            output_tail: 1000,
            keep_lock: false,
            strict: false,
        }
    }
}

impl RepairConfig {
    pub fn lock_file_name(&self) -> &str {
        self.lock_file
            .as_deref()
            .unwrap_or_else(|| self.package_manager.lockfile())
    }
}

#[derive(Debug, Clone)]
pub struct LoadedRepairConfig {
    pub path: Option<PathBuf>,
    pub data: RepairConfig,
}

/// Loads `explicit` if given, otherwise the first config file found in the
/// current directory, otherwise the built-in defaults.
pub fn load_repair_config(explicit: Option<&Path>) -> Result<LoadedRepairConfig> {
    if let Some(path) = explicit {
        if !path.is_file() {
            bail!("config file {} does not exist", path.display());
        }
        let data = read_config_file(path, ConfigFormat::from_path(path))?;
        return Ok(LoadedRepairConfig {
            path: Some(path.to_path_buf()),
            data,
        });
    }

    let current_dir = std::env::current_dir().context("resolving current directory for config")?;
    load_repair_config_from_dir(&current_dir)
}

pub fn load_repair_config_from_dir(base_dir: &Path) -> Result<LoadedRepairConfig> {
    for (file, format) in CONFIG_CANDIDATES {
        let path = base_dir.join(file);
        if !path.exists() {
            continue;
        }
        let data = read_config_file(&path, *format)?;
        return Ok(LoadedRepairConfig {
            path: Some(path),
            data,
        });
    }
    Ok(LoadedRepairConfig {
        path: None,
        data: RepairConfig::default(),
    })
}

fn read_config_file(path: &Path, format: ConfigFormat) -> Result<RepairConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading repair config at {}", path.display()))?;
    match format {
        ConfigFormat::Yaml => parse_yaml_str(&content)
            .with_context(|| format!("parsing YAML config at {}", path.display())),
        ConfigFormat::Toml => parse_toml_str(&content)
            .with_context(|| format!("parsing TOML config at {}", path.display())),
    }
}

pub(crate) fn parse_yaml_str(content: &str) -> Result<RepairConfig> {
    // An empty YAML document deserializes as unit, not as an empty map.
    if content.trim().is_empty() {
        return Ok(RepairConfig::default());
    }
    Ok(serde_yaml::from_str(content)?)
}

pub(crate) fn parse_toml_str(content: &str) -> Result<RepairConfig> {
    Ok(toml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_hardcoded_layout() {
        let cfg = RepairConfig::default();
        assert_eq!(
            cfg.candidates,
            vec![
                PathBuf::from("/vercel/share/v0-project"),
                PathBuf::from("/vercel/share/v0-next-shadcn"),
            ]
        );
        assert_eq!(cfg.scan_root, PathBuf::from("/vercel/share"));
        assert_eq!(cfg.manifest, "package.json");
        assert_eq!(cfg.cache_dirs, vec!["node_modules", ".next"]);
        assert_eq!(cfg.lock_file_name(), "package-lock.json");
        assert_eq!(cfg.timeout_secs, 180);
        assert_eq!(cfg.output_tail, 1000);
        assert!(!cfg.keep_lock);
        assert!(!cfg.strict);
    }

    #[test]
    fn partial_yaml_keeps_remaining_defaults() {
        let yaml = r#"candidates:
  - "/srv/app"
timeout_secs: 30
package_manager: pnpm
"#;
        let cfg = parse_yaml_str(yaml).expect("yaml parse");
        assert_eq!(cfg.candidates, vec![PathBuf::from("/srv/app")]);
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.package_manager, PackageManager::Pnpm);
        assert_eq!(cfg.lock_file_name(), "pnpm-lock.yaml");
        assert_eq!(cfg.scan_root, PathBuf::from("/vercel/share"));
        assert_eq!(cfg.cache_dirs, vec!["node_modules", ".next"]);
    }

    #[test]
    fn toml_lock_file_overrides_manager_default() {
        let toml = r#"scan_root = "/work"
cache_dirs = ["node_modules", ".next", ".turbo"]
lock_file = "npm-shrinkwrap.json"
strict = true
"#;
        let cfg = parse_toml_str(toml).expect("toml parse");
        assert_eq!(cfg.scan_root, PathBuf::from("/work"));
        assert_eq!(cfg.cache_dirs.len(), 3);
        assert_eq!(cfg.lock_file_name(), "npm-shrinkwrap.json");
        assert!(cfg.strict);
    }

    #[test]
    fn empty_yaml_is_all_defaults() {
        assert_eq!(parse_yaml_str("\n").expect("yaml parse"), RepairConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse_toml_str("timeout = 5\n").is_err());
    }

    #[test]
    fn discovery_prefers_yml_over_toml() {
        let tmp = tempdir().expect("temp dir");
        fs::write(tmp.path().join("fix-deps.yml"), "timeout_secs: 10\n").expect("write yml");
        fs::write(tmp.path().join("fix-deps.toml"), "timeout_secs = 20\n").expect("write toml");

        let loaded = load_repair_config_from_dir(tmp.path()).expect("load config");
        assert_eq!(loaded.path, Some(tmp.path().join("fix-deps.yml")));
        assert_eq!(loaded.data.timeout_secs, 10);
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let tmp = tempdir().expect("temp dir");
        let loaded = load_repair_config_from_dir(tmp.path()).expect("load config");
        assert!(loaded.path.is_none());
        assert_eq!(loaded.data, RepairConfig::default());
    }

    #[test]
    fn explicit_config_path_must_exist() {
        let tmp = tempdir().expect("temp dir");
        let missing = tmp.path().join("nope.toml");
        let err = load_repair_config(Some(&missing)).expect_err("missing file");
        assert!(err.to_string().contains("does not exist"), "error was: {err}");
    }

    #[test]
    fn explicit_config_format_follows_extension() {
        let tmp = tempdir().expect("temp dir");
        let path = tmp.path().join("custom.toml");
        fs::write(&path, "output_tail = 200\n").expect("write toml");

        let loaded = load_repair_config(Some(&path)).expect("load config");
        assert_eq!(loaded.data.output_tail, 200);
    }
}
