use std::fs;
use std::io;
use std::path::Path;

use log::{debug, warn};

use crate::utils::shell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Absent,
    Removed,
    /// The first delete left something behind and `rm -rf` finished the job.
    ForceRemoved,
    /// Both attempts ran and the path still exists.
    Residue,
}

/// Best-effort recursive delete of `path` with a forced fallback.
/// Never fails; what happened is reported in the outcome.
pub fn remove_cache_dir(path: &Path) -> RemoveOutcome {
    remove_cache_dir_with(path, remove_any, shell::force_remove)
}

pub(crate) fn remove_cache_dir_with<F, G>(path: &Path, first: F, fallback: G) -> RemoveOutcome
where
    F: FnOnce(&Path) -> io::Result<()>,
    G: FnOnce(&Path) -> anyhow::Result<()>,
{
    // symlink_metadata so a dangling symlink still counts as present
    if !exists(path) {
        return RemoveOutcome::Absent;
    }

    if let Err(e) = first(path) {
        debug!("delete of {} failed: {e}", path.display());
    }
    if !exists(path) {
        return RemoveOutcome::Removed;
    }

    if let Err(e) = fallback(path) {
        debug!("forced delete of {} failed: {e:#}", path.display());
    }
    if exists(path) {
        warn!("{} still exists after forced delete", path.display());
        RemoveOutcome::Residue
    } else {
        RemoveOutcome::ForceRemoved
    }
}

fn remove_any(path: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(path)?;
    if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// `node_modules` is named as is; anything else is a build cache.
fn label(name: &str) -> String {
    if name == "node_modules" {
        name.to_string()
    } else {
        format!("{name} cache")
    }
}

/// Progress line printed once a target has been handled.
fn outcome_line(name: &str, outcome: RemoveOutcome) -> Option<String> {
    match outcome {
        RemoveOutcome::Absent => None,
        RemoveOutcome::Removed | RemoveOutcome::ForceRemoved => Some(format!("Removed {}", label(name))),
        RemoveOutcome::Residue => Some(format!("Could not fully remove {}", label(name))),
    }
}

/// Clear every cache directory under `root`, printing progress as it goes.
pub fn clean_caches(root: &Path, cache_dirs: &[String]) -> Vec<(String, RemoveOutcome)> {
    cache_dirs
        .iter()
        .map(|name| {
            let target = root.join(name);
            if exists(&target) {
                println!("Removing {}...", label(name));
            }
            let outcome = remove_cache_dir(&target);
            match outcome_line(name, outcome) {
                Some(line) => println!("{line}"),
                None => debug!("{name} not present, skipping"),
            }
            (name.clone(), outcome)
        })
        .collect()
}
