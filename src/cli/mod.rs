//! CLI implementation using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::report::DEFAULT_SAMPLE_SIZE;

/// Refminer - find commits that refactor test code across many repositories.
#[derive(Parser)]
#[command(name = "refminer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for the run summary
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Mine every repository in a project list and write the reports
    #[command(alias = "run")]
    Collect(CollectArgs),

    /// Classify the commits of one local repository without writing reports
    Scan(ScanArgs),

    /// Draw a random sample of a test-only report for manual review
    Sample(SampleArgs),
}

#[derive(Args)]
pub struct CollectArgs {
    /// Comma-separated project list; first column holds `owner/name`
    pub input: PathBuf,

    /// Directory for the commit reports
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Directory for the error lists
    #[arg(short, long)]
    pub error_dir: Option<PathBuf>,

    /// Root of the local repository copies
    #[arg(short, long)]
    pub repos_dir: Option<PathBuf>,

    /// Source file extension for the test heuristics (repeatable)
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Also write the URLs of repositories whose history walk failed
    #[arg(long)]
    pub walk_errors: bool,
}

#[derive(Args)]
pub struct ScanArgs {
    /// Path to the repository
    #[arg(short, long, default_value = ".")]
    pub path: PathBuf,

    /// Name shown for the repository (defaults to its path)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Source file extension for the test heuristics (repeatable)
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,
}

#[derive(Args)]
pub struct SampleArgs {
    /// Test-only report to sample
    pub input: PathBuf,

    /// Number of rows to draw
    #[arg(short, long, default_value_t = DEFAULT_SAMPLE_SIZE)]
    pub size: usize,

    /// Seed for a reproducible sample
    #[arg(long)]
    pub seed: Option<u64>,

    /// Sampled CSV path (defaults to `sampling_<input>` in the output dir)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write `{sha, owner, repository}` lines to this NDJSON file
    #[arg(long, value_name = "PATH")]
    pub ndjson: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Text,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_collect_requires_input() {
        assert!(Cli::try_parse_from(["refminer", "collect"]).is_err());
    }

    #[test]
    fn test_collect_defaults() {
        let cli = Cli::try_parse_from(["refminer", "collect", "projects.csv"]).unwrap();
        let Command::Collect(args) = cli.command else {
            panic!("expected collect");
        };
        assert_eq!(args.input, PathBuf::from("projects.csv"));
        assert!(args.output_dir.is_none());
        assert!(args.error_dir.is_none());
        assert!(args.repos_dir.is_none());
        assert!(args.extensions.is_empty());
        assert!(!args.walk_errors);
    }

    #[test]
    fn test_collect_overrides() {
        let cli = Cli::try_parse_from([
            "refminer",
            "collect",
            "p.csv",
            "-o",
            "out",
            "-e",
            "err",
            "-r",
            "/data/repos",
            "--ext",
            "java",
            "--ext",
            "kt",
            "--walk-errors",
        ])
        .unwrap();
        let Command::Collect(args) = cli.command else {
            panic!("expected collect");
        };
        assert_eq!(args.output_dir, Some(PathBuf::from("out")));
        assert_eq!(args.error_dir, Some(PathBuf::from("err")));
        assert_eq!(args.repos_dir, Some(PathBuf::from("/data/repos")));
        assert_eq!(args.extensions, vec!["java", "kt"]);
        assert!(args.walk_errors);
    }

    #[test]
    fn test_alias_run_for_collect() {
        let cli = Cli::try_parse_from(["refminer", "run", "p.csv"]).unwrap();
        assert!(matches!(cli.command, Command::Collect(_)));
    }

    #[test]
    fn test_scan_default_path() {
        let cli = Cli::try_parse_from(["refminer", "scan"]).unwrap();
        let Command::Scan(args) = cli.command else {
            panic!("expected scan");
        };
        assert_eq!(args.path, PathBuf::from("."));
        assert!(args.name.is_none());
    }

    #[test]
    fn test_scan_name() {
        let cli = Cli::try_parse_from(["refminer", "scan", "-p", "/tmp/x", "-n", "acme/x"]).unwrap();
        if let Command::Scan(args) = cli.command {
            assert_eq!(args.path, PathBuf::from("/tmp/x"));
            assert_eq!(args.name.as_deref(), Some("acme/x"));
        }
    }

    #[test]
    fn test_sample_defaults() {
        let cli = Cli::try_parse_from(["refminer", "sample", "b.csv"]).unwrap();
        let Command::Sample(args) = cli.command else {
            panic!("expected sample");
        };
        assert_eq!(args.input, PathBuf::from("b.csv"));
        assert_eq!(args.size, 370);
        assert!(args.seed.is_none());
        assert!(args.output.is_none());
        assert!(args.ndjson.is_none());
    }

    #[test]
    fn test_sample_options() {
        let cli = Cli::try_parse_from([
            "refminer", "sample", "b.csv", "-s", "25", "--seed", "9", "-o", "s.csv", "--ndjson",
            "s.ndjson",
        ])
        .unwrap();
        let Command::Sample(args) = cli.command else {
            panic!("expected sample");
        };
        assert_eq!(args.size, 25);
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.output, Some(PathBuf::from("s.csv")));
        assert_eq!(args.ndjson, Some(PathBuf::from("s.ndjson")));
    }

    #[test]
    fn test_sample_requires_input() {
        assert!(Cli::try_parse_from(["refminer", "sample"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["refminer", "-v", "-f", "json", "-c", "r.toml", "scan"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.format, OutputFormat::Json));
        assert_eq!(cli.config, Some(PathBuf::from("r.toml")));
    }

    #[test]
    fn test_output_format_default() {
        let cli = Cli::try_parse_from(["refminer", "scan"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Text));
    }
}
