//! Harness configuration.
//!
//! Both generators take the same report-type selector, spelled differently on their command lines
//! (the Go tool takes a comma-joined list, the .NET tool a semicolon-joined one). The harness
//! restricts the selection to the types whose main output file it knows how to verify.
//!
//! An optional TOML file (`--config`, or `cov-compare.toml` under the root) can override the
//! default selection and the location of the two generators:
//!
//! ```toml
//! report-types = ["TextSummary", "Html"]
//!
//! [tools]
//! go-generator = "go_report_generator/cmd"
//! dotnet-generator = "src/ReportGenerator.Console.NetCore/bin/Release/net8.0/ReportGenerator.dll"
//! ```

use error::{ErrorKind, Result, ResultExt};

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::slice::Iter;
use std::str::FromStr;

/// A report format both generators understand and whose main output file the harness can verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    /// Plain-text summary of aggregate coverage percentages.
    TextSummary,
    /// HTML report with one page per source file.
    Html,
    /// LCOV tracefile.
    Lcov,
}

impl ReportType {
    /// The selector string understood by both generators.
    pub fn name(self) -> &'static str {
        match self {
            ReportType::TextSummary => "TextSummary",
            ReportType::Html => "Html",
            ReportType::Lcov => "Lcov",
        }
    }

    /// The file a generator is expected to leave in its output directory for this type.
    pub fn expected_file(self) -> &'static str {
        match self {
            ReportType::TextSummary => "Summary.txt",
            ReportType::Html => "index.html",
            ReportType::Lcov => "lcov.info",
        }
    }
}

impl FromStr for ReportType {
    type Err = ::error::Error;

    fn from_str(s: &str) -> Result<ReportType> {
        Ok(match s {
            "TextSummary" => ReportType::TextSummary,
            "Html" => ReportType::Html,
            "Lcov" => ReportType::Lcov,
            _ => bail!(ErrorKind::UnsupportedReportType(s.to_owned())),
        })
    }
}

/// Non-empty selection of report types, deduplicated, in the order first mentioned.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTypes(Vec<ReportType>);

impl ReportTypes {
    /// Parses a selection from the strings of the command line or the configuration file. Blank
    /// entries are skipped, duplicates are kept once.
    ///
    /// # Errors
    ///
    /// * [`UnsupportedReportType`] for a name outside the supported set.
    /// * [`NoReportTypes`] when nothing but blank strings was selected.
    ///
    /// [`UnsupportedReportType`]: ../error/enum.ErrorKind.html#variant.UnsupportedReportType
    /// [`NoReportTypes`]: ../error/enum.ErrorKind.html#variant.NoReportTypes
    pub fn from_multi_str<'a, I>(strings: I) -> Result<ReportTypes>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut types = Vec::new();
        for s in strings {
            let s = s.trim();
            if s.is_empty() {
                continue;
            }
            let ty = s.parse::<ReportType>()?;
            if !types.contains(&ty) {
                types.push(ty);
            }
        }
        ensure!(!types.is_empty(), ErrorKind::NoReportTypes);
        Ok(ReportTypes(types))
    }

    pub fn iter(&self) -> Iter<ReportType> {
        self.0.iter()
    }

    /// The comma-joined `-reporttypes=` value of the Go generator.
    pub fn go_arg(&self) -> String {
        self.join(",")
    }

    /// The semicolon-joined `-reporttypes:` value of the .NET generator.
    pub fn dotnet_arg(&self) -> String {
        self.join(";")
    }

    fn join(&self, separator: &str) -> String {
        self.0.iter().map(|ty| ty.name()).collect::<Vec<_>>().join(separator)
    }
}

impl Default for ReportTypes {
    /// The plain-text summary alone.
    fn default() -> ReportTypes {
        ReportTypes(vec![ReportType::TextSummary])
    }
}

/// Content of the optional configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    report_types: Option<Vec<String>>,
    #[serde(default)]
    tools: Tools,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct Tools {
    go_generator: Option<PathBuf>,
    dotnet_generator: Option<PathBuf>,
}

impl Config {
    /// Reads the configuration from `path`, or from `cov-compare.toml` under the root when no
    /// explicit path is given. A missing default file is not an error; everything falls back to
    /// the built-in defaults.
    pub fn load(path: Option<&Path>, root: &Path) -> Result<Config> {
        let path = match path {
            Some(path) => path.to_owned(),
            None => {
                let default = root.join("cov-compare.toml");
                if !default.is_file() {
                    debug!("no configuration file at {}, using defaults", default.display());
                    return Ok(Config::default());
                }
                default
            },
        };

        let mut content = String::new();
        File::open(&path)
            .chain_err(|| format!("Cannot open configuration at `{}`", path.display()))?
            .read_to_string(&mut content)?;
        let config = ::toml::from_str(&content).chain_err(|| format!("Cannot parse configuration at `{}`", path.display()))?;
        debug!("configuration loaded from {}", path.display());
        Ok(config)
    }

    /// The report types selected by the configuration file, or the default selection.
    pub fn report_types(&self) -> Result<ReportTypes> {
        match self.report_types {
            Some(ref types) => ReportTypes::from_multi_str(types.iter().map(String::as_str)),
            None => Ok(ReportTypes::default()),
        }
    }

    /// Configured location of the Go-based generator sources, relative to the root.
    pub fn go_generator(&self) -> Option<&Path> {
        self.tools.go_generator.as_ref().map(PathBuf::as_path)
    }

    /// Configured location of the compiled .NET generator, relative to the root.
    pub fn dotnet_generator(&self) -> Option<&Path> {
        self.tools.dotnet_generator.as_ref().map(PathBuf::as_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use error::ErrorKind;

    #[test]
    fn test_parse_report_types() {
        let types = ReportTypes::from_multi_str(["TextSummary", "Html", "TextSummary", " Lcov "].iter().cloned()).unwrap();
        assert_eq!(types.go_arg(), "TextSummary,Html,Lcov");
        assert_eq!(types.dotnet_arg(), "TextSummary;Html;Lcov");
    }

    #[test]
    fn test_unknown_report_type_is_rejected() {
        let err = ReportTypes::from_multi_str(["HtmlDark"].iter().cloned()).unwrap_err();
        match *err.kind() {
            ErrorKind::UnsupportedReportType(ref name) => assert_eq!(name, "HtmlDark"),
            ref e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn test_blank_selection_is_rejected() {
        let err = ReportTypes::from_multi_str(["", "  "].iter().cloned()).unwrap_err();
        match *err.kind() {
            ErrorKind::NoReportTypes => {},
            ref e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn test_expected_files() {
        assert_eq!(ReportType::TextSummary.expected_file(), "Summary.txt");
        assert_eq!(ReportType::Html.expected_file(), "index.html");
        assert_eq!(ReportType::Lcov.expected_file(), "lcov.info");
    }

    #[test]
    fn test_config_overrides() {
        let config: Config = ::toml::from_str(
            r#"
                report-types = ["Html", "Lcov"]

                [tools]
                go-generator = "tools/generator/cmd"
            "#,
        ).unwrap();
        assert_eq!(config.report_types().unwrap().go_arg(), "Html,Lcov");
        assert_eq!(config.go_generator(), Some(Path::new("tools/generator/cmd")));
        assert_eq!(config.dotnet_generator(), None);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.report_types().unwrap().go_arg(), "TextSummary");
        assert_eq!(config.go_generator(), None);
        assert_eq!(config.dotnet_generator(), None);
    }
}
