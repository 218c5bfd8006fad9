// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the CLI structure is a Rust struct and clap
// generates the parsing code, --help and --version from it.
//
//   wasc websites.csv                      default criteria, JSON on stdout
//   wasc websites.csv -c checkers.txt      one chain made of the listed checkers
//   wasc websites.csv -C criteria.toml     several named chains
//   wasc websites.csv -C criteria.yml      same, in YAML
//   wasc websites.csv -f csv -o out.csv    CSV report in a file
//   wasc --list-checkers                   print known checkers and exit
// =============================================================================

use std::path::PathBuf;

use clap::Parser;

use wasc::report::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "wasc",
    version,
    about = "Websites Accessibility Criteria Checker",
    long_about = "wasc checks accessibility and legal-compliance criteria on a list of websites: \
                  doctype, language, accessibility mention and statement, legal notice, contact link..."
)]
pub struct Cli {
    /// CSV file listing the websites as `label;url` lines
    ///
    /// Lines starting with '#' are comments.
    #[arg(required_unless_present = "list_checkers")]
    pub websites: Option<PathBuf>,

    /// File listing checker names, one per line, run as a single chain
    #[arg(short = 'c', long, conflicts_with = "criteria")]
    pub checkers: Option<PathBuf>,

    /// Criteria file: TOML ([[criterion]] name / checkers) or, with a .yaml
    /// or .yml extension, a YAML mapping `name: [checkers...]`
    #[arg(short = 'C', long)]
    pub criteria: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Json)]
    pub output_format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// List known checkers and exit
    #[arg(short = 'l', long)]
    pub list_checkers: bool,

    /// Number of websites analysed at the same time
    #[arg(short = 'j', long, default_value_t = 8)]
    pub jobs: usize,

    /// Timeout of each HTTP request, in seconds
    #[arg(short = 't', long, default_value_t = 10)]
    pub timeout: u64,

    /// Do not draw the progress bar on stderr
    #[arg(long)]
    pub no_progress: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["wasc", "sites.csv"]);
        assert_eq!(cli.websites, Some(PathBuf::from("sites.csv")));
        assert_eq!(cli.output_format, OutputFormat::Json);
        assert_eq!(cli.jobs, 8);
        assert_eq!(cli.timeout, 10);
        assert!(!cli.list_checkers);
        assert!(!cli.no_progress);
    }

    #[test]
    fn test_no_progress_flag() {
        let cli = Cli::parse_from(["wasc", "sites.csv", "--no-progress"]);
        assert!(cli.no_progress);
    }

    #[test]
    fn test_list_checkers_needs_no_websites() {
        let cli = Cli::parse_from(["wasc", "-l"]);
        assert!(cli.list_checkers);
        assert!(cli.websites.is_none());
    }

    #[test]
    fn test_websites_required_otherwise() {
        assert!(Cli::try_parse_from(["wasc"]).is_err());
    }

    #[test]
    fn test_checkers_and_criteria_conflict() {
        let result = Cli::try_parse_from(["wasc", "sites.csv", "-c", "a.txt", "-C", "b.toml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_csv_output() {
        let cli = Cli::parse_from(["wasc", "sites.csv", "-f", "csv", "-o", "out.csv"]);
        assert_eq!(cli.output_format, OutputFormat::Csv);
        assert_eq!(cli.output, Some(PathBuf::from("out.csv")));
    }
}
