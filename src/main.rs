//! `cov-compare` drives the coverage workflows of two fixture projects (a .NET one and a Go one),
//! converts their coverage output into Cobertura XML, and runs two independent report generators
//! over the same data, so the generators' outputs can be compared side by side.
//!
//! The harness only orchestrates: every test run, format conversion and report rendering is
//! delegated to an external tool. The single correctness signal is that each expected output file
//! exists and is non-empty.

#![recursion_limit = "128"] // needed for error_chain.

#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate clap;
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;
extern crate env_logger;
extern crate glob;
extern crate serde;
extern crate shell_escape;
extern crate termcolor;
extern crate toml;

#[cfg(test)]
extern crate tempfile;

#[macro_use]
mod ui;
mod config;
mod error;
mod fsutils;
mod layout;
mod lookup;
mod runner;
mod verify;
mod workflow;

use config::{Config, ReportTypes};
use error::Result;
use layout::Layout;
use workflow::CleanTargets;

use clap::ArgMatches;

use std::env::current_dir;
use std::path::{Path, PathBuf};
use std::process::exit;

/// Program entry. Calls [`run()`] and prints any error returned to `stderr`.
///
/// [`run()`]: ./fn.run.html
fn main() {
    if let Err(error) = run() {
        ui::print_error(&error).expect("error while printing error");
        exit(1);
    }
}

/// Runs the `cov-compare` program.
fn run() -> Result<()> {
    let matches = parse_args();
    env_logger::init();

    let (subcommand, matches) = matches.subcommand();
    let matches = matches.expect("matches");

    let root = match matches.value_of_os("root") {
        Some(root) => PathBuf::from(root),
        None => current_dir()?,
    };
    let config = Config::load(matches.value_of_os("config").map(Path::new), &root)?;

    match subcommand {
        "generate" => generate(&root, &config, matches),
        "clean" => clean(&root, &config, matches),
        _ => unreachable!("subcommand"),
    }
}

/// Parses the command line arguments using `clap`.
fn parse_args() -> ArgMatches<'static> {
    const HELP_TEMPLATE: &str = "\
{about}

Usage:
    cov-compare <subcommand> [options]

Options:
{options}

Subcommands:
{subcommands}
";

    clap_app!(cov_compare =>
        (name: "cov-compare")
        (bin_name: "cov-compare")
        (about: crate_description!())
        (version: crate_version!())
        (template: HELP_TEMPLATE)
        (@setting DeriveDisplayOrder)
        (@setting SubcommandRequiredElseHelp)
        (@setting GlobalVersion)
        (@arg root: --root [DIR] +global "Path to the fixture tree, default to the current directory")
        (@arg config: --config [PATH] +global "Path to the harness configuration file, default to `<root>/cov-compare.toml`")
        (@subcommand generate =>
            (about: "Run both coverage workflows and generate all reports")
            (@arg reporttypes: --reporttypes [TYPES]... +use_delimiter possible_values(&[
                "TextSummary",
                "Html",
                "Lcov",
            ]) "Report types requested from both generators, default to TextSummary")
        )
        (@subcommand clean =>
            (about: "Remove generated coverage artifacts and report directories")
            (@arg coverage: --coverage "Remove the coverage files only")
            (@arg reports: --reports "Remove the report directories only")
        )
    ).get_matches()
}

/// Parses the command line arguments and forwards to [`workflow::generate()`].
///
/// [`workflow::generate()`]: workflow/fn.generate.html
fn generate(root: &Path, config: &Config, matches: &ArgMatches) -> Result<()> {
    let report_types = match matches.values_of("reporttypes") {
        Some(types) => ReportTypes::from_multi_str(types)?,
        None => config.report_types()?,
    };
    let layout = Layout::new(root, config)?;
    workflow::generate(&layout, &report_types)
}

/// Parses the command line arguments and forwards to [`workflow::clean()`].
///
/// [`workflow::clean()`]: workflow/fn.clean.html
fn clean(root: &Path, config: &Config, matches: &ArgMatches) -> Result<()> {
    let mut clean_targets = CleanTargets::empty();
    if matches.is_present("coverage") {
        clean_targets |= CleanTargets::COVERAGE;
    }
    if matches.is_present("reports") {
        clean_targets |= CleanTargets::REPORTS;
    }
    if clean_targets.is_empty() {
        clean_targets = CleanTargets::COVERAGE | CleanTargets::REPORTS;
    }

    let layout = Layout::new(root, config)?;
    workflow::clean(&layout, clean_targets)
}
