//! Locations inside the fixture tree.
//!
//! Everything the harness touches lives at a fixed place relative to the root:
//!
//! ```text
//! <root>/
//!     Testprojects/
//!         CSharp/
//!             Project_DotNetCore/UnitTests/UnitTests.csproj
//!             Reports/coverage.cobertura.xml
//!         Go/
//!             coverage.out
//!             coverage.cobertura.xml
//!     reports/
//!         csharp_project_go_tool_report/
//!         csharp_project_dotnet_tool_report/
//!         go_project_go_tool_native_report/
//!         go_project_go_tool_cobertura_report/
//!         go_project_dotnet_tool_report/
//!         merged_csharp_go_report/
//!     go_report_generator/cmd/
//!     src/ReportGenerator.Console.NetCore/bin/…/ReportGenerator.dll
//! ```

use config::Config;
use error::{Result, ResultExt};

use std::fs::canonicalize;
use std::path::{Path, PathBuf};

/// Resolved paths of everything inside the fixture tree. All paths are absolute, anchored at the
/// canonicalized root.
#[derive(Debug)]
pub struct Layout {
    /// Canonical root of the fixture tree.
    pub root: PathBuf,
    /// The C# unit-test project file passed to `dotnet test`.
    pub csharp_test_project: PathBuf,
    /// Directory receiving the C# coverage output.
    pub csharp_coverage_dir: PathBuf,
    /// Cobertura XML written by Coverlet during `dotnet test`.
    pub csharp_cobertura_xml: PathBuf,
    /// Go-generator report over the C# coverage.
    pub csharp_go_tool_report_dir: PathBuf,
    /// .NET-generator report over the C# coverage.
    pub csharp_dotnet_tool_report_dir: PathBuf,
    /// The Go project tested with `go test`.
    pub go_project_dir: PathBuf,
    /// Native profile written by `go test -coverprofile`.
    pub go_native_coverage: PathBuf,
    /// Cobertura XML converted from the native profile.
    pub go_cobertura_xml: PathBuf,
    /// Go-generator report straight from the native profile.
    pub go_tool_native_report_dir: PathBuf,
    /// Go-generator report from the converted Cobertura XML.
    pub go_tool_cobertura_report_dir: PathBuf,
    /// .NET-generator report over the Go coverage.
    pub go_dotnet_tool_report_dir: PathBuf,
    /// Combined C# + Go report.
    pub merged_report_dir: PathBuf,
    /// Parent of all report output directories.
    pub reports_dir: PathBuf,
    /// Source directory of the Go-based generator, run through `go run .`.
    pub go_generator_dir: PathBuf,
    /// Explicit location of the compiled .NET generator, when configured.
    pub dotnet_generator_hint: Option<PathBuf>,
}

impl Layout {
    /// Resolves the layout against a canonicalized `root`, applying the tool-path overrides of
    /// the configuration file. Relative overrides are anchored at the root.
    pub fn new(root: &Path, config: &Config) -> Result<Layout> {
        let root = canonicalize(root).chain_err(|| format!("Cannot resolve fixture root `{}`", root.display()))?;

        let testprojects = root.join("Testprojects");
        if !testprojects.is_dir() {
            warning!("`{}` has no Testprojects directory, the workflows are likely to fail", root.display());
        }

        let csharp_dir = testprojects.join("CSharp");
        let csharp_coverage_dir = csharp_dir.join("Reports");
        let go_project_dir = testprojects.join("Go");
        let reports_dir = root.join("reports");

        let go_generator_dir = match config.go_generator() {
            Some(dir) => root.join(dir),
            None => root.join("go_report_generator").join("cmd"),
        };

        Ok(Layout {
            csharp_test_project: csharp_dir.join("Project_DotNetCore").join("UnitTests").join("UnitTests.csproj"),
            csharp_cobertura_xml: csharp_coverage_dir.join("coverage.cobertura.xml"),
            csharp_coverage_dir,
            csharp_go_tool_report_dir: reports_dir.join("csharp_project_go_tool_report"),
            csharp_dotnet_tool_report_dir: reports_dir.join("csharp_project_dotnet_tool_report"),
            go_native_coverage: go_project_dir.join("coverage.out"),
            go_cobertura_xml: go_project_dir.join("coverage.cobertura.xml"),
            go_project_dir,
            go_tool_native_report_dir: reports_dir.join("go_project_go_tool_native_report"),
            go_tool_cobertura_report_dir: reports_dir.join("go_project_go_tool_cobertura_report"),
            go_dotnet_tool_report_dir: reports_dir.join("go_project_dotnet_tool_report"),
            merged_report_dir: reports_dir.join("merged_csharp_go_report"),
            reports_dir,
            go_generator_dir,
            dotnet_generator_hint: config.dotnet_generator().map(|dll| root.join(dll)),
            root,
        })
    }

    /// Every report output directory, in generation order.
    pub fn report_dirs(&self) -> [&PathBuf; 6] {
        [
            &self.csharp_go_tool_report_dir,
            &self.csharp_dotnet_tool_report_dir,
            &self.go_tool_native_report_dir,
            &self.go_tool_cobertura_report_dir,
            &self.go_dotnet_tool_report_dir,
            &self.merged_report_dir,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::Config;

    use tempfile::TempDir;

    use std::fs::create_dir;

    #[test]
    fn test_layout_is_anchored_at_the_root() {
        let dir = TempDir::new().expect("created temporary directory");
        create_dir(dir.path().join("Testprojects")).unwrap();
        let layout = Layout::new(dir.path(), &Config::default()).unwrap();

        assert!(layout.csharp_test_project.ends_with("Testprojects/CSharp/Project_DotNetCore/UnitTests/UnitTests.csproj"));
        assert!(layout.csharp_cobertura_xml.ends_with("Testprojects/CSharp/Reports/coverage.cobertura.xml"));
        assert!(layout.go_native_coverage.ends_with("Testprojects/Go/coverage.out"));
        assert!(layout.go_cobertura_xml.ends_with("Testprojects/Go/coverage.cobertura.xml"));
        assert!(layout.merged_report_dir.ends_with("reports/merged_csharp_go_report"));
        assert!(layout.go_generator_dir.ends_with("go_report_generator/cmd"));
        assert_eq!(layout.dotnet_generator_hint, None);
        assert_eq!(layout.report_dirs().len(), 6);
    }

    #[test]
    fn test_tool_overrides_are_anchored_at_the_root() {
        let dir = TempDir::new().expect("created temporary directory");
        create_dir(dir.path().join("Testprojects")).unwrap();
        let config: Config = ::toml::from_str(
            "[tools]\ngo-generator = \"gen/cmd\"\ndotnet-generator = \"gen/ReportGenerator.dll\"\n",
        ).unwrap();
        let layout = Layout::new(dir.path(), &config).unwrap();

        assert!(layout.go_generator_dir.ends_with("gen/cmd"));
        assert!(layout.dotnet_generator_hint.unwrap().ends_with("gen/ReportGenerator.dll"));
    }
}
