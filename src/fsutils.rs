//! Filesystem helpers shared by the workflows and the `clean` subcommand.

use error::{Result, ResultExt};

use std::fs::{create_dir_all, remove_dir_all, remove_file};
use std::io;
use std::path::Path;

/// Idempotently creates `dir` and any missing ancestors. Succeeds silently when the directory is
/// already there.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    create_dir_all(dir).chain_err(|| format!("Cannot create directory `{}`", dir.display()))?;
    trace!("directory ensured: {}", dir.display());
    Ok(())
}

/// Removes a directory tree. Succeeds when the directory does not exist.
pub fn clean_dir(dir: &Path) -> io::Result<()> {
    match remove_dir_all(dir) {
        Err(ref e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        res => res,
    }
}

/// Unlinks a file left behind by a previous run. Succeeds when the file does not exist.
pub fn remove_stale(file: &Path) -> io::Result<()> {
    match remove_file(file) {
        Ok(()) => {
            debug!("removed stale {}", file.display());
            Ok(())
        },
        Err(ref e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[test]
fn test_ensure_dir_is_idempotent() {
    let dir = ::tempfile::TempDir::new().expect("created temporary directory");
    let target = dir.path().join("reports").join("nested");
    ensure_dir(&target).unwrap();
    assert!(target.is_dir());
    ensure_dir(&target).unwrap();
    assert!(target.is_dir());
}

#[test]
fn test_clean_dir_tolerates_absence() {
    let dir = ::tempfile::TempDir::new().expect("created temporary directory");
    clean_dir(&dir.path().join("never-created")).unwrap();
}

#[test]
fn test_remove_stale_tolerates_absence() {
    let dir = ::tempfile::TempDir::new().expect("created temporary directory");
    let file = dir.path().join("coverage.out");
    remove_stale(&file).unwrap();
    ::std::fs::write(&file, "mode: set\n").unwrap();
    remove_stale(&file).unwrap();
    assert!(!file.exists());
}
