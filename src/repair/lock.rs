use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Delete the lock file under `root` if there is one. Returns whether a file was removed.
pub fn remove_lock_file(root: &Path, lock_file: &str) -> Result<bool> {
    let lock = root.join(lock_file);
    if !lock.is_file() {
        return Ok(false);
    }
    fs::remove_file(&lock).with_context(|| format!("removing {}", lock.display()))?;
    println!("Removed {lock_file}");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn removes_existing_lock_file() {
        let tmp = tempdir().expect("tempdir");
        let lock = tmp.path().join("package-lock.json");
        fs::write(&lock, "{\"lockfileVersion\": 3}").expect("write lock");

        assert!(remove_lock_file(tmp.path(), "package-lock.json").expect("remove"));
        assert!(!lock.exists());
    }

    #[test]
    fn missing_lock_file_is_a_no_op() {
        let tmp = tempdir().expect("tempdir");
        assert!(!remove_lock_file(tmp.path(), "package-lock.json").expect("no-op"));
        assert!(!tmp.path().join("package-lock.json").exists());
    }

    #[test]
    fn only_the_named_lock_is_removed() {
        let tmp = tempdir().expect("tempdir");
        fs::write(tmp.path().join("yarn.lock"), "# yarn").expect("write yarn.lock");
        fs::write(tmp.path().join("package-lock.json"), "{}").expect("write npm lock");

        remove_lock_file(tmp.path(), "yarn.lock").expect("remove");
        assert!(!tmp.path().join("yarn.lock").exists());
        assert!(tmp.path().join("package-lock.json").exists());
    }
}
