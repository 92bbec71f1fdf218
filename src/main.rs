use std::io::Read as _;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use shipsafe::cancel::CancellationToken;
use shipsafe::cli::{ci_exit_code, detect_ci_platform, resolve_format, scan_exit_code, CiArgs, Cli, Command, ScanArgs};
use shipsafe::config::{Config, OutputFormat};
use shipsafe::diff::model::Report;
use shipsafe::{diff, report, Pipeline};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let verbose = match &cli.command {
        Command::Scan(args) => args.verbose,
        Command::Ci(args) => args.verbose,
    };
    init_logging(verbose);

    let result = match cli.command {
        Command::Scan(args) => run_scan(args).await,
        Command::Ci(args) => run_ci(args).await,
    };

    match result {
        Ok(code) => ExitCode::from(code as u8),
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("shipsafe=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("shipsafe=info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

async fn run_scan(args: ScanArgs) -> anyhow::Result<i32> {
    let config = Config::load(args.config.as_deref())?;
    let diff = read_diff(args.diff.as_deref())?;

    let pipeline = Pipeline::new(config.clone())?;
    let cancel = CancellationToken::new();
    let report = pipeline.run(diff, &cancel).await?;

    let format = resolve_format(&config, args.format);
    emit(&report, format, args.output.as_deref())?;

    Ok(scan_exit_code(report.trust_score.rating))
}

async fn run_ci(args: CiArgs) -> anyhow::Result<i32> {
    let platform = detect_ci_platform();
    tracing::info!(?platform, "detected CI platform");

    let config = Config::load(args.config.as_deref())?;
    let diff = read_diff(args.diff.as_deref())?;

    let pipeline = Pipeline::new(config.clone())?;
    let cancel = CancellationToken::new();
    let report = pipeline.run(diff, &cancel).await?;

    let format = resolve_format(&config, None);
    emit(&report, format, None)?;

    Ok(ci_exit_code(config.ci.fail_on, report.trust_score.rating))
}

fn read_diff(path: Option<&std::path::Path>) -> anyhow::Result<diff::model::Diff> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let cancel = CancellationToken::new();
    Ok(diff::parse(&text, String::new(), String::new(), &cancel)?)
}

fn emit(report: &Report, format: OutputFormat, output: Option<&std::path::Path>) -> anyhow::Result<()> {
    let text = match format {
        OutputFormat::Terminal => report::terminal::format(report),
        OutputFormat::Json => report::json::format(report)?,
        OutputFormat::Markdown => report::markdown::format(report),
    };

    match output {
        Some(path) => std::fs::write(path, text)?,
        None => println!("{text}"),
    }

    Ok(())
}
