//! Error types of the harness.
//!
//! Every category below is unrecoverable: the run prints the diagnostic and aborts. The kinds
//! exist to make that diagnostic name the failing stage precisely.

use std::path::PathBuf;
use std::process::ExitStatus;

error_chain! {
    foreign_links {
        Io(::std::io::Error);
        TomlDe(::toml::de::Error);
    }

    errors {
        /// A command specification with nothing to execute. Raised before any process is spawned.
        EmptyCommand(label: String) {
            description("empty command line")
            display("`{}` has an empty command line, nothing to execute", label)
        }

        /// A stdin redirection pointing at a file that does not exist. Raised before spawning.
        RedirectSourceMissing(label: String, path: PathBuf) {
            description("stdin redirection source missing")
            display("`{}` redirects stdin from `{}` which does not exist", label, path.display())
        }

        /// The executable of a command cannot be resolved.
        CommandNotFound(program: String) {
            description("command not found")
            display("command not found: `{}`, ensure it is installed and reachable through PATH", program)
        }

        /// An external tool exited with a non-zero status.
        CommandFailed(label: String, status: ExitStatus) {
            description("external command failed")
            display("`{}` exited with status {}", label, status)
        }

        /// An expected output artifact is missing or empty.
        ArtifactMissing(what: String, path: PathBuf) {
            description("expected artifact missing or empty")
            display("{} was not generated or is empty at `{}`", what, path.display())
        }

        /// One of the two report generators is not installed where the preflight check expected it.
        ReportToolNotFound(tool: &'static str, path: PathBuf) {
            description("report generator not found")
            display("{} not found at `{}`", tool, path.display())
        }

        /// The project to be tested is missing from the fixture tree.
        ProjectNotFound(path: PathBuf) {
            description("fixture project not found")
            display("project to test not found at `{}`", path.display())
        }

        /// A generator finished successfully but did not leave every requested report file behind.
        ReportVerificationFailed(tool: String) {
            description("report verification failed")
            display("{} did not produce all requested report files", tool)
        }

        /// A report type outside the set both generators support.
        UnsupportedReportType(name: String) {
            description("unsupported report type")
            display("unsupported report type `{}`, expected TextSummary, Html or Lcov", name)
        }

        /// An empty report type selection.
        NoReportTypes {
            description("no report types selected")
        }
    }
}
