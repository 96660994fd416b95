//! Fail-fast execution of external commands.
//!
//! Every stage of the harness shells out to some external tool. [`Invocation`] builds the command
//! from a discrete argument list and enforces the abort-on-failure policy: a non-zero exit status
//! or an unresolvable executable fails the whole run. There is no shell-interpretation mode;
//! input and output redirection go through managed process streams instead of `<`/`>`.
//!
//! [`Invocation`]: ./struct.Invocation.html

use error::{Error, ErrorKind, Result, ResultExt};

use shell_escape::escape;

use std::ffi::{OsStr, OsString};
use std::fs::File;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

/// Longest command line preview printed before execution.
const PREVIEW_LIMIT: usize = 120;

/// Captured output of a successfully finished command, returned for optional inspection.
#[derive(Debug)]
pub struct Captured {
    pub stdout: String,
    pub stderr: String,
}

impl Captured {
    /// Logs both captured streams at trace level for post-mortem inspection.
    pub fn trace(&self, label: &str) {
        if !self.stdout.is_empty() {
            trace!("{} stdout:\n{}", label, self.stdout);
        }
        if !self.stderr.is_empty() {
            trace!("{} stderr:\n{}", label, self.stderr);
        }
    }
}

/// A single external command invocation.
#[derive(Debug)]
pub struct Invocation<'a> {
    /// Human-readable name of the stage, used in every diagnostic about this command.
    label: &'a str,
    /// Program and arguments. The first element is the program to execute.
    argv: Vec<OsString>,
    cwd: Option<&'a Path>,
    stdin_from: Option<&'a Path>,
    stdout_to: Option<&'a Path>,
}

impl<'a> Invocation<'a> {
    /// Creates an empty invocation. At least one argument (the program itself) must be added
    /// before [`run()`] is called.
    ///
    /// [`run()`]: #method.run
    pub fn new(label: &'a str) -> Invocation<'a> {
        Invocation {
            label,
            argv: Vec::new(),
            cwd: None,
            stdin_from: None,
            stdout_to: None,
        }
    }

    /// Appends one argument.
    pub fn arg<S: AsRef<OsStr>>(&mut self, arg: S) -> &mut Invocation<'a> {
        self.argv.push(arg.as_ref().to_owned());
        self
    }

    /// Appends several arguments.
    pub fn args<S: AsRef<OsStr>>(&mut self, args: &[S]) -> &mut Invocation<'a> {
        for arg in args {
            self.argv.push(arg.as_ref().to_owned());
        }
        self
    }

    /// Runs the command inside `dir` instead of the current directory.
    pub fn current_dir(&mut self, dir: &'a Path) -> &mut Invocation<'a> {
        self.cwd = Some(dir);
        self
    }

    /// Feeds the command's stdin from `source`.
    pub fn stdin_from(&mut self, source: &'a Path) -> &mut Invocation<'a> {
        self.stdin_from = Some(source);
        self
    }

    /// Writes the command's stdout to `target`, creating or truncating it.
    pub fn stdout_to(&mut self, target: &'a Path) -> &mut Invocation<'a> {
        self.stdout_to = Some(target);
        self
    }

    /// Spawns the command and waits for it to finish, capturing its output.
    ///
    /// # Errors
    ///
    /// * [`EmptyCommand`] or [`RedirectSourceMissing`] when the specification is wrong; detected
    ///   before anything is executed.
    /// * [`CommandNotFound`] when the executable cannot be resolved.
    /// * [`CommandFailed`] when the command exits with a non-zero status. The captured output is
    ///   echoed before the error is returned.
    ///
    /// [`EmptyCommand`]: ../error/enum.ErrorKind.html#variant.EmptyCommand
    /// [`RedirectSourceMissing`]: ../error/enum.ErrorKind.html#variant.RedirectSourceMissing
    /// [`CommandNotFound`]: ../error/enum.ErrorKind.html#variant.CommandNotFound
    /// [`CommandFailed`]: ../error/enum.ErrorKind.html#variant.CommandFailed
    pub fn run(&self) -> Result<Captured> {
        ensure!(!self.argv.is_empty(), ErrorKind::EmptyCommand(self.label.to_owned()));
        if let Some(source) = self.stdin_from {
            ensure!(source.is_file(), ErrorKind::RedirectSourceMissing(self.label.to_owned(), source.to_owned()));
        }

        match self.cwd {
            Some(dir) => progress!("Running", "{} (in {})", self.preview(), dir.display()),
            None => progress!("Running", "{}", self.preview()),
        }

        let mut command = Command::new(&self.argv[0]);
        command.args(&self.argv[1..]);
        if let Some(dir) = self.cwd {
            command.current_dir(dir);
        }
        command.stdin(match self.stdin_from {
            Some(source) => File::open(source)?.into(),
            None => Stdio::null(),
        });
        command.stdout(match self.stdout_to {
            Some(target) => File::create(target).chain_err(|| format!("Cannot create `{}`", target.display()))?.into(),
            None => Stdio::piped(),
        });
        command.stderr(Stdio::piped());

        let child = command.spawn().map_err(|e| self.spawn_error(e))?;
        let output = child.wait_with_output()?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            failure!("`{}` exited with {}", self.label, output.status);
            echo("stdout", &stdout);
            echo("stderr", &stderr);
            bail!(ErrorKind::CommandFailed(self.label.to_owned(), output.status));
        }

        debug!("{} succeeded ({} bytes stdout, {} bytes stderr)", self.label, stdout.len(), stderr.len());
        Ok(Captured { stdout, stderr })
    }

    /// Renders a truncated, shell-escaped preview of the command line for the audit trail.
    fn preview(&self) -> String {
        let mut rendered = self.argv
            .iter()
            .map(|arg| escape(arg.to_string_lossy()))
            .collect::<Vec<_>>()
            .join(" ");
        if rendered.len() > PREVIEW_LIMIT {
            let mut cut = PREVIEW_LIMIT;
            while !rendered.is_char_boundary(cut) {
                cut -= 1;
            }
            rendered.truncate(cut);
            rendered.push_str("...");
        }
        rendered
    }

    /// Converts a spawn failure into a distinguishable diagnostic when the program is missing.
    fn spawn_error(&self, error: io::Error) -> Error {
        if error.kind() == io::ErrorKind::NotFound {
            ErrorKind::CommandNotFound(self.argv[0].to_string_lossy().into_owned()).into()
        } else {
            error.into()
        }
    }
}

/// Echoes a captured stream for diagnostics, indented under its name. Empty streams are skipped.
fn echo(name: &str, content: &str) {
    let content = content.trim();
    if content.is_empty() {
        return;
    }
    eprintln!("  {}:", name);
    for line in content.lines() {
        eprintln!("    {}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use error::ErrorKind;

    use tempfile::TempDir;

    use std::fs;

    #[test]
    fn test_empty_command_line_is_a_configuration_error() {
        let err = Invocation::new("noop").run().unwrap_err();
        match *err.kind() {
            ErrorKind::EmptyCommand(ref label) => assert_eq!(label, "noop"),
            ref e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn test_missing_stdin_source_is_a_configuration_error() {
        let dir = TempDir::new().expect("created temporary directory");
        let source = dir.path().join("absent.out");
        let err = Invocation::new("convert").arg("cat").stdin_from(&source).run().unwrap_err();
        match *err.kind() {
            ErrorKind::RedirectSourceMissing(ref label, ref path) => {
                assert_eq!(label, "convert");
                assert_eq!(path, &source);
            },
            ref e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn test_unresolvable_program_is_distinguishable() {
        let err = Invocation::new("missing tool").arg("cov-compare-no-such-program").run().unwrap_err();
        match *err.kind() {
            ErrorKind::CommandNotFound(ref program) => assert_eq!(program, "cov-compare-no-such-program"),
            ref e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    #[cfg(unix)]
    fn test_captures_both_streams() {
        let captured = Invocation::new("streams")
            .args(&["sh", "-c", "printf out; printf err >&2"])
            .run()
            .unwrap();
        assert_eq!(captured.stdout, "out");
        assert_eq!(captured.stderr, "err");
    }

    #[test]
    #[cfg(unix)]
    fn test_nonzero_exit_fails() {
        let err = Invocation::new("doomed").args(&["sh", "-c", "exit 3"]).run().unwrap_err();
        match *err.kind() {
            ErrorKind::CommandFailed(ref label, status) => {
                assert_eq!(label, "doomed");
                assert_eq!(status.code(), Some(3));
            },
            ref e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    #[cfg(unix)]
    fn test_managed_stream_redirection() {
        let dir = TempDir::new().expect("created temporary directory");
        let source = dir.path().join("coverage.out");
        let target = dir.path().join("coverage.xml");
        fs::write(&source, "mode: set\n").expect("write source");
        Invocation::new("convert")
            .arg("cat")
            .stdin_from(&source)
            .stdout_to(&target)
            .run()
            .unwrap();
        assert_eq!(fs::read_to_string(&target).expect("read target"), "mode: set\n");
    }

    #[test]
    fn test_preview_is_truncated() {
        let mut invocation = Invocation::new("long");
        invocation.arg("tool");
        for _ in 0..40 {
            invocation.arg("argument");
        }
        let preview = invocation.preview();
        assert!(preview.len() <= PREVIEW_LIMIT + 3);
        assert!(preview.ends_with("..."));
    }
}
