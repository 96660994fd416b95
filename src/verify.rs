//! Artifact verification.
//!
//! The harness never inspects report contents. The only correctness signal, for coverage files
//! and rendered reports alike, is that every expected output file exists and is non-empty.

use config::ReportTypes;

use std::path::Path;

/// Returns true only when `path` is an existing file with a size greater than zero bytes.
///
/// Prints a `Verified` line with the path on success and a `failure:` line otherwise, but never
/// aborts by itself: whether a failed check is fatal is the caller's decision.
pub fn artifact_ok(path: &Path, what: &str) -> bool {
    let size = match path.metadata() {
        Ok(ref metadata) if metadata.is_file() => metadata.len(),
        _ => 0,
    };
    if size > 0 {
        progress!("Verified", "{}: {}", what, path.display());
        true
    } else {
        failure!("{} was not generated or is empty at `{}`", what, path.display());
        false
    }
}

/// Checks every report file the selected `types` are expected to leave inside `dir`.
///
/// All files are checked even after the first miss, so a single run reports everything at once.
pub fn reports_ok(dir: &Path, types: &ReportTypes, tool: &str) -> bool {
    debug!("verifying {} output in {}", tool, dir.display());
    if !dir.is_dir() {
        failure!("output directory `{}` of {} does not exist", dir.display(), tool);
        return false;
    }

    let mut all_ok = true;
    for ty in types.iter() {
        let report = dir.join(ty.expected_file());
        if !artifact_ok(&report, &format!("{} {} report", tool, ty.name())) {
            all_ok = false;
        }
    }
    all_ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::ReportTypes;

    use tempfile::TempDir;

    use std::fs;

    #[test]
    fn test_artifact_ok() {
        let dir = TempDir::new().expect("created temporary directory");

        let missing = dir.path().join("missing.xml");
        assert!(!artifact_ok(&missing, "missing artifact"));

        let empty = dir.path().join("empty.xml");
        fs::write(&empty, "").unwrap();
        assert!(!artifact_ok(&empty, "empty artifact"));

        let filled = dir.path().join("coverage.xml");
        fs::write(&filled, "<coverage/>").unwrap();
        assert!(artifact_ok(&filled, "coverage"));
    }

    #[test]
    fn test_a_directory_is_not_an_artifact() {
        let dir = TempDir::new().expect("created temporary directory");
        assert!(!artifact_ok(dir.path(), "directory"));
    }

    #[test]
    fn test_reports_ok_checks_each_selected_type() {
        let dir = TempDir::new().expect("created temporary directory");
        let types = ReportTypes::from_multi_str(["TextSummary", "Lcov"].iter().cloned()).unwrap();
        assert!(!reports_ok(dir.path(), &types, "Go-tool"));

        fs::write(dir.path().join("Summary.txt"), "Line coverage: 83.3%\n").unwrap();
        assert!(!reports_ok(dir.path(), &types, "Go-tool"));

        fs::write(dir.path().join("lcov.info"), "TN:\nend_of_record\n").unwrap();
        assert!(reports_ok(dir.path(), &types, "Go-tool"));
    }

    #[test]
    fn test_reports_ok_requires_the_directory() {
        let dir = TempDir::new().expect("created temporary directory");
        let types = ReportTypes::default();
        assert!(!reports_ok(&dir.path().join("never-created"), &types, "Go-tool"));
    }
}
