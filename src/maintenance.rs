//! Housekeeping for log and snapshot directories.

use std::fs;
use std::io;
use std::path::Path;

use log::{debug, info};

/// Remove every regular file in `dir` with the given extension (without
/// the leading dot). Returns how many files were removed. A missing
/// directory is a no-op; the operation is idempotent.
pub fn clean_dir(dir: &Path, extension: &str) -> io::Result<usize> {
    if !dir.is_dir() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(extension) {
            fs::remove_file(&path)?;
            debug!("removed {}", path.display());
            removed += 1;
        }
    }

    info!(
        "removed {removed} .{extension} files from {}",
        dir.display()
    );
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_only_matching_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("run1.log"), "a").unwrap();
        fs::write(dir.path().join("run2.log"), "b").unwrap();
        fs::write(dir.path().join("inventory_20250101_000000.json"), "{}").unwrap();

        let removed = clean_dir(dir.path(), "log").unwrap();
        assert_eq!(removed, 2);
        assert!(dir.path().join("inventory_20250101_000000.json").exists());
        assert!(!dir.path().join("run1.log").exists());
    }

    #[test]
    fn missing_directory_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("does-not-exist");
        assert_eq!(clean_dir(&gone, "log").unwrap(), 0);
    }

    #[test]
    fn repeat_run_removes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("only.json"), "{}").unwrap();
        assert_eq!(clean_dir(dir.path(), "json").unwrap(), 1);
        assert_eq!(clean_dir(dir.path(), "json").unwrap(), 0);
    }
}
