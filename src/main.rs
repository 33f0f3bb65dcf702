//! Refminer CLI - mine git histories for test refactoring commits.

use std::io::stdout;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use refminer::cli::{Cli, CollectArgs, Command, OutputFormat, SampleArgs, ScanArgs};
use refminer::classify::CommitClassifier;
use refminer::config::Config;
use refminer::git::GitRepo;
use refminer::output::Format;
use refminer::report::{ReportPaths, SampleRequest};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load_default(".")?,
    };

    let format = match cli.format {
        OutputFormat::Json => Format::Json,
        OutputFormat::Markdown => Format::Markdown,
        OutputFormat::Text => Format::Text,
    };

    match cli.command {
        Command::Collect(args) => run_collect(config, args, format),
        Command::Scan(args) => run_scan(config, args, format),
        Command::Sample(args) => run_sample(config, args, format),
    }
}

fn run_collect(mut config: Config, args: CollectArgs, format: Format) -> anyhow::Result<()> {
    if let Some(dir) = args.output_dir {
        config.output.dir = dir;
    }
    if let Some(dir) = args.error_dir {
        config.output.error_dir = dir;
    }
    if let Some(dir) = args.repos_dir {
        config.repos_dir = dir;
    }
    if !args.extensions.is_empty() {
        config.source_extensions = args.extensions;
    }
    config.output.walk_errors |= args.walk_errors;
    config.validate()?;

    let paths = ReportPaths::derive(
        &args.input,
        &config.output.dir,
        &config.output.error_dir,
        config.output.walk_errors,
    );
    let summary = refminer::pipeline::collect(config, &args.input, &paths)
        .with_context(|| format!("collection from {} failed", args.input.display()))?;

    format.format(&summary, &mut stdout())?;
    if let Some(e) = &summary.report_error {
        eprintln!("{} {e}", "Warning:".yellow().bold());
    }
    eprintln!(
        "{} {} refactor commits, {} test-only, written to {}",
        "Done:".green().bold(),
        summary.refactor_commits,
        summary.test_only_commits,
        paths.refactor_commits.display()
    );
    Ok(())
}

fn run_scan(mut config: Config, args: ScanArgs, format: Format) -> anyhow::Result<()> {
    if !args.extensions.is_empty() {
        config.source_extensions = args.extensions;
    }
    config.validate()?;

    let repo = GitRepo::open(&args.path)
        .with_context(|| format!("cannot open repository at {}", args.path.display()))?;
    let classifier = CommitClassifier::new(config.file_classifier());
    let mut report = refminer::pipeline::scan(&repo, &classifier)?;
    if let Some(name) = args.name {
        report.repository = name;
    }

    format.format(&report, &mut stdout())?;
    Ok(())
}

fn run_sample(config: Config, args: SampleArgs, format: Format) -> anyhow::Result<()> {
    let output = args
        .output
        .unwrap_or_else(|| SampleRequest::default_output(&args.input, &config.output.dir));
    let request = SampleRequest {
        input: args.input,
        output,
        ndjson: args.ndjson,
        size: args.size,
        seed: args.seed,
    };
    let summary = refminer::report::sample_report(&request)
        .with_context(|| format!("sampling {} failed", request.input.display()))?;

    format.format(&summary, &mut stdout())?;
    eprintln!(
        "{} {} of {} rows written to {}",
        "Done:".green().bold(),
        summary.rows_sampled,
        summary.rows_available,
        summary.output
    );
    Ok(())
}
