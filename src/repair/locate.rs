use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

/// Where the project root was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectSource {
    Explicit,
    Candidate,
    Scan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedProject {
    pub root: PathBuf,
    pub source: ProjectSource,
}

/// Inputs of the project search.
#[derive(Debug, Clone, Copy)]
pub struct SearchPlan<'a> {
    pub explicit: Option<&'a Path>,
    pub candidates: &'a [PathBuf],
    pub scan_root: &'a Path,
    pub manifest: &'a str,
}

/// Resolve the project root. An explicit directory wins and is never
/// second-guessed; otherwise candidates are tried in order, then the scan
/// root's subdirectories in name order.
pub fn locate_project(plan: &SearchPlan<'_>) -> Option<LocatedProject> {
    if let Some(dir) = plan.explicit {
        if dir.is_dir() {
            return Some(LocatedProject {
                root: dir.to_path_buf(),
                source: ProjectSource::Explicit,
            });
        }
        debug!("explicit project {} is not a directory", dir.display());
        return None;
    }

    if let Some(root) = first_existing_candidate(plan.candidates) {
        return Some(LocatedProject {
            root,
            source: ProjectSource::Candidate,
        });
    }

    scan_for_manifest(plan.scan_root, plan.manifest).map(|root| LocatedProject {
        root,
        source: ProjectSource::Scan,
    })
}

fn first_existing_candidate(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates
        .iter()
        .find(|candidate| {
            let found = candidate.is_dir();
            debug!("candidate {}: {}", candidate.display(), if found { "present" } else { "absent" });
            found
        })
        .cloned()
}

fn scan_for_manifest(scan_root: &Path, manifest: &str) -> Option<PathBuf> {
    let entries = match fs::read_dir(scan_root) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("cannot scan {}: {e}", scan_root.display());
            return None;
        }
    };

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    dirs.into_iter().find(|dir| dir.join(manifest).is_file())
}
