//! Preflight lookup of the two report generators.
//!
//! Both generators are located up front; a missing installation aborts the run before any
//! coverage is collected.

use error::{ErrorKind, Result};
use layout::Layout;

use glob::glob;

use std::path::PathBuf;

/// Glob patterns, relative to the fixture root, searched for the compiled .NET generator when no
/// explicit location is configured.
const DOTNET_GENERATOR_GLOB_PATTERNS: &[&str] = &[
    "src/ReportGenerator.Console.NetCore/bin/Debug/net*/ReportGenerator.dll",
    "src/ReportGenerator.Console.NetCore/bin/Release/net*/ReportGenerator.dll",
];

/// Confirms the Go-based generator sources are present and returns their directory.
///
/// The generator is not a prebuilt binary; it is executed through `go run .` inside its source
/// directory, so the preflight only requires `main.go` to be there.
///
/// # Errors
///
/// Returns [`ReportToolNotFound`] when the directory or its `main.go` is missing.
///
/// [`ReportToolNotFound`]: ../error/enum.ErrorKind.html#variant.ReportToolNotFound
pub fn find_go_generator(layout: &Layout) -> Result<PathBuf> {
    let dir = layout.go_generator_dir.clone();
    if dir.is_dir() && dir.join("main.go").is_file() {
        progress!("Found", "Go report generator at {}", dir.display());
        Ok(dir)
    } else {
        bail!(ErrorKind::ReportToolNotFound("Go report generator", dir))
    }
}

/// Locates `ReportGenerator.dll`.
///
/// An explicit location from the configuration file wins and must exist. Otherwise the build
/// output of the generator project is searched with glob patterns; among several built target
/// frameworks the newest one (the last in path order) is taken.
///
/// # Errors
///
/// Returns [`ReportToolNotFound`] when no DLL can be found.
///
/// [`ReportToolNotFound`]: ../error/enum.ErrorKind.html#variant.ReportToolNotFound
pub fn find_dotnet_generator(layout: &Layout) -> Result<PathBuf> {
    if let Some(ref dll) = layout.dotnet_generator_hint {
        if dll.is_file() {
            progress!("Found", ".NET report generator at {}", dll.display());
            return Ok(dll.clone());
        }
        bail!(ErrorKind::ReportToolNotFound(".NET report generator", dll.clone()));
    }

    for pattern in DOTNET_GENERATOR_GLOB_PATTERNS {
        let pattern = layout.root.join(pattern);
        let pattern = pattern.to_str().expect("UTF-8 fixture path");
        let found = glob(pattern)
            .expect("glob pattern")
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    debug!("cannot glob {}: {}", pattern, e);
                    None
                },
            })
            .max();
        if let Some(dll) = found {
            progress!("Found", ".NET report generator at {}", dll.display());
            return Ok(dll);
        }
    }

    bail!(ErrorKind::ReportToolNotFound(
        ".NET report generator",
        layout.root.join("src").join("ReportGenerator.Console.NetCore"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::Config;
    use error::ErrorKind;
    use layout::Layout;

    use tempfile::TempDir;

    use std::fs::{create_dir_all, write};

    fn empty_layout(dir: &TempDir) -> Layout {
        create_dir_all(dir.path().join("Testprojects")).unwrap();
        Layout::new(dir.path(), &Config::default()).unwrap()
    }

    #[test]
    fn test_find_go_generator() {
        let dir = TempDir::new().expect("created temporary directory");
        let layout = empty_layout(&dir);

        match *find_go_generator(&layout).unwrap_err().kind() {
            ErrorKind::ReportToolNotFound(tool, _) => assert_eq!(tool, "Go report generator"),
            ref e => panic!("unexpected error {:?}", e),
        }

        create_dir_all(&layout.go_generator_dir).unwrap();
        match *find_go_generator(&layout).unwrap_err().kind() {
            ErrorKind::ReportToolNotFound(..) => {},
            ref e => panic!("unexpected error {:?}", e),
        }

        write(layout.go_generator_dir.join("main.go"), "package main\n").unwrap();
        assert_eq!(find_go_generator(&layout).unwrap(), layout.go_generator_dir);
    }

    #[test]
    fn test_find_dotnet_generator_by_glob() {
        let dir = TempDir::new().expect("created temporary directory");
        let layout = empty_layout(&dir);

        match *find_dotnet_generator(&layout).unwrap_err().kind() {
            ErrorKind::ReportToolNotFound(tool, _) => assert_eq!(tool, ".NET report generator"),
            ref e => panic!("unexpected error {:?}", e),
        }

        let dll_dir = layout.root.join("src/ReportGenerator.Console.NetCore/bin/Debug/net8.0");
        create_dir_all(&dll_dir).unwrap();
        write(dll_dir.join("ReportGenerator.dll"), "MZ").unwrap();
        assert_eq!(find_dotnet_generator(&layout).unwrap(), dll_dir.join("ReportGenerator.dll"));
    }

    #[test]
    fn test_find_dotnet_generator_prefers_the_newest_framework() {
        let dir = TempDir::new().expect("created temporary directory");
        let layout = empty_layout(&dir);

        let bin = layout.root.join("src/ReportGenerator.Console.NetCore/bin/Debug");
        for framework in &["net6.0", "net8.0"] {
            let dll_dir = bin.join(framework);
            create_dir_all(&dll_dir).unwrap();
            write(dll_dir.join("ReportGenerator.dll"), "MZ").unwrap();
        }
        assert_eq!(find_dotnet_generator(&layout).unwrap(), bin.join("net8.0").join("ReportGenerator.dll"));
    }

    #[test]
    fn test_configured_dotnet_generator_must_exist() {
        let dir = TempDir::new().expect("created temporary directory");
        create_dir_all(dir.path().join("Testprojects")).unwrap();
        let config: Config = ::toml::from_str("[tools]\ndotnet-generator = \"tools/ReportGenerator.dll\"\n").unwrap();
        let layout = Layout::new(dir.path(), &config).unwrap();

        match *find_dotnet_generator(&layout).unwrap_err().kind() {
            ErrorKind::ReportToolNotFound(tool, ref path) => {
                assert_eq!(tool, ".NET report generator");
                assert!(path.ends_with("tools/ReportGenerator.dll"));
            },
            ref e => panic!("unexpected error {:?}", e),
        }
    }
}
