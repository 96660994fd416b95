//! The coverage-and-report workflows.
//!
//! Everything here is strictly sequential and fail-fast. The C# project runs to completion before
//! the Go project starts, the merged report comes last, and the first failed command or missing
//! artifact aborts the whole run. The two projects share nothing but read-only coverage files and
//! write to disjoint subtrees of `reports/`, so no locking is needed anywhere.

use config::ReportTypes;
use error::{ErrorKind, Result, ResultExt};
use fsutils::{clean_dir, ensure_dir, remove_stale};
use layout::Layout;
use lookup::{find_dotnet_generator, find_go_generator};
use runner::Invocation;
use verify;

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

bitflags! {
    /// Artifact classes removed by `cov-compare clean`.
    pub struct CleanTargets: u8 {
        /// The native and Cobertura coverage files of both projects.
        const COVERAGE = 1;
        /// Every report directory under `reports/`.
        const REPORTS = 2;
    }
}

/// Resolved locations of the two report generators, filled in by the preflight check.
#[derive(Debug)]
struct Generators {
    /// Source directory of the Go-based generator.
    go: PathBuf,
    /// Compiled .NET generator assembly, executed through the `dotnet` host.
    dotnet: PathBuf,
}

/// Entry point of `cov-compare generate`.
///
/// Runs the preflight lookup of both generators, then the C# workflow, the Go workflow and the
/// merged report, in that fixed order. Returns `Ok(())` only when every stage succeeded.
pub fn generate(layout: &Layout, types: &ReportTypes) -> Result<()> {
    progress!("Selected", "report types: {}", types.go_arg());

    let generators = Generators {
        go: find_go_generator(layout)?,
        dotnet: find_dotnet_generator(layout)?,
    };

    csharp_workflow(layout, types, &generators)?;
    go_workflow(layout, types, &generators)?;
    merged_workflow(layout, types, &generators)?;

    progress!("Finished", "all workflows completed, reports are in {}", layout.reports_dir.display());
    Ok(())
}

/// Entry point of `cov-compare clean`. Removes the chosen artifact classes, tolerating ones that
/// were never generated.
pub fn clean(layout: &Layout, clean_targets: CleanTargets) -> Result<()> {
    if clean_targets.contains(CleanTargets::COVERAGE) {
        for &file in [&layout.csharp_cobertura_xml, &layout.go_native_coverage, &layout.go_cobertura_xml].iter() {
            progress!("Removing", "{}", file.display());
            remove_stale(file).chain_err(|| format!("Cannot remove `{}`", file.display()))?;
        }
    }
    if clean_targets.contains(CleanTargets::REPORTS) {
        for &dir in layout.report_dirs().iter() {
            progress!("Removing", "{}", dir.display());
            clean_dir(dir).chain_err(|| format!("Cannot remove `{}`", dir.display()))?;
        }
    }
    Ok(())
}

/// Collects C# coverage through `dotnet test` with the Coverlet collector, which writes Cobertura
/// XML directly, then renders the XML with both generators.
fn csharp_workflow(layout: &Layout, types: &ReportTypes, generators: &Generators) -> Result<()> {
    progress!("Workflow", "C# project");

    for &dir in [&layout.csharp_coverage_dir, &layout.csharp_go_tool_report_dir, &layout.csharp_dotnet_tool_report_dir].iter() {
        ensure_dir(dir)?;
    }

    Invocation::new("dotnet test (C#)")
        .args(&["dotnet", "test"])
        .arg(&layout.csharp_test_project)
        .args(&["--configuration", "Release", "--verbosity", "minimal"])
        .args(&["/p:CollectCoverage=true", "/p:CoverletOutputFormat=cobertura"])
        .arg(eq_arg("/p:CoverletOutput=", &layout.csharp_cobertura_xml))
        .run()?
        .trace("dotnet test (C#)");
    verify_artifact(&layout.csharp_cobertura_xml, "C# Cobertura XML")?;

    run_go_generator(
        "Go report generator (C# Cobertura)",
        generators,
        layout.csharp_cobertura_xml.as_os_str(),
        &layout.csharp_go_tool_report_dir,
        types,
        None,
    )?;
    verify_reports(&layout.csharp_go_tool_report_dir, types, "C# Go-tool")?;

    run_dotnet_generator(
        ".NET ReportGenerator (C# Cobertura)",
        generators,
        &layout.csharp_cobertura_xml,
        &layout.csharp_dotnet_tool_report_dir,
        types,
    )?;
    verify_reports(&layout.csharp_dotnet_tool_report_dir, types, "C# .NET-tool")?;

    progress!("Completed", "C# project workflow");
    Ok(())
}

/// Collects Go coverage with `go test -coverprofile`, renders the native profile directly, then
/// converts it to Cobertura XML and renders the XML with both generators.
fn go_workflow(layout: &Layout, types: &ReportTypes, generators: &Generators) -> Result<()> {
    progress!("Workflow", "Go project");

    for &dir in [&layout.go_tool_native_report_dir, &layout.go_tool_cobertura_report_dir, &layout.go_dotnet_tool_report_dir].iter() {
        ensure_dir(dir)?;
    }

    ensure!(layout.go_project_dir.is_dir(), ErrorKind::ProjectNotFound(layout.go_project_dir.clone()));

    // Leftovers from an earlier run must not satisfy the verification below.
    remove_stale(&layout.go_native_coverage)?;
    remove_stale(&layout.go_cobertura_xml)?;

    Invocation::new("go test (Go)")
        .args(&["go", "test"])
        .arg(eq_arg("-coverprofile=", &layout.go_native_coverage))
        .arg("./...")
        .current_dir(&layout.go_project_dir)
        .run()?
        .trace("go test (Go)");
    verify_artifact(&layout.go_native_coverage, "Go native coverage profile")?;

    run_go_generator(
        "Go report generator (Go native)",
        generators,
        layout.go_native_coverage.as_os_str(),
        &layout.go_tool_native_report_dir,
        types,
        Some(&layout.go_project_dir),
    )?;
    verify_reports(&layout.go_tool_native_report_dir, types, "Go-project Go-tool (native)")?;

    Invocation::new("gocover-cobertura")
        .arg("gocover-cobertura")
        .current_dir(&layout.go_project_dir)
        .stdin_from(&layout.go_native_coverage)
        .stdout_to(&layout.go_cobertura_xml)
        .run()?
        .trace("gocover-cobertura");
    verify_artifact(&layout.go_cobertura_xml, "Go Cobertura XML")?;

    run_go_generator(
        "Go report generator (Go Cobertura)",
        generators,
        layout.go_cobertura_xml.as_os_str(),
        &layout.go_tool_cobertura_report_dir,
        types,
        None,
    )?;
    verify_reports(&layout.go_tool_cobertura_report_dir, types, "Go-project Go-tool (Cobertura)")?;

    run_dotnet_generator(
        ".NET ReportGenerator (Go Cobertura)",
        generators,
        &layout.go_cobertura_xml,
        &layout.go_dotnet_tool_report_dir,
        types,
    )?;
    verify_reports(&layout.go_dotnet_tool_report_dir, types, "Go-project .NET-tool")?;

    progress!("Completed", "Go project workflow");
    Ok(())
}

/// Produces one combined report from the C# Cobertura XML and the Go native profile. The Go-based
/// generator accepts several inputs joined with `;` in a single `-report=` argument.
fn merged_workflow(layout: &Layout, types: &ReportTypes, generators: &Generators) -> Result<()> {
    progress!("Workflow", "merged C# + Go report");

    ensure_dir(&layout.merged_report_dir)?;
    verify_artifact(&layout.csharp_cobertura_xml, "C# Cobertura XML (merged input)")?;
    verify_artifact(&layout.go_native_coverage, "Go native coverage profile (merged input)")?;

    let mut merged_inputs = OsString::new();
    merged_inputs.push(&layout.csharp_cobertura_xml);
    merged_inputs.push(";");
    merged_inputs.push(&layout.go_native_coverage);

    run_go_generator(
        "Go report generator (merged)",
        generators,
        &merged_inputs,
        &layout.merged_report_dir,
        types,
        Some(&layout.go_project_dir),
    )?;
    verify_reports(&layout.merged_report_dir, types, "merged Go-tool")?;

    progress!("Completed", "merged report workflow");
    Ok(())
}

/// Runs the Go-based generator through `go run .` inside its source directory. `report` is one
/// coverage file, or several joined with `;`.
fn run_go_generator(label: &str, generators: &Generators, report: &OsStr, output_dir: &Path, types: &ReportTypes, source_dirs: Option<&Path>) -> Result<()> {
    let mut invocation = Invocation::new(label);
    invocation
        .args(&["go", "run", "."])
        .arg(os_arg("-report=", report))
        .arg(eq_arg("-output=", output_dir))
        .arg(format!("-reporttypes={}", types.go_arg()))
        .current_dir(&generators.go);
    if let Some(dirs) = source_dirs {
        invocation.arg(eq_arg("-sourcedirs=", dirs));
    }
    invocation.run()?.trace(label);
    Ok(())
}

/// Runs the compiled .NET generator through the `dotnet` host.
fn run_dotnet_generator(label: &str, generators: &Generators, report: &Path, output_dir: &Path, types: &ReportTypes) -> Result<()> {
    Invocation::new(label)
        .arg("dotnet")
        .arg(&generators.dotnet)
        .arg(eq_arg("-reports:", report))
        .arg(eq_arg("-targetdir:", output_dir))
        .arg(format!("-reporttypes:{}", types.dotnet_arg()))
        .run()?
        .trace(label);
    Ok(())
}

/// Fails the run unless `path` is a non-empty file.
fn verify_artifact(path: &Path, what: &str) -> Result<()> {
    ensure!(verify::artifact_ok(path, what), ErrorKind::ArtifactMissing(what.to_owned(), path.to_owned()));
    Ok(())
}

/// Fails the run unless every requested report file is present in `dir`.
fn verify_reports(dir: &Path, types: &ReportTypes, tool: &str) -> Result<()> {
    ensure!(verify::reports_ok(dir, types, tool), ErrorKind::ReportVerificationFailed(tool.to_owned()));
    Ok(())
}

/// Joins a flag ending in `=` or `:` with a path value into a single argument, without lossy
/// conversion of the path.
fn eq_arg(flag: &str, value: &Path) -> OsString {
    os_arg(flag, value.as_os_str())
}

fn os_arg(flag: &str, value: &OsStr) -> OsString {
    let mut arg = OsString::from(flag);
    arg.push(value);
    arg
}
