use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::{debug, error};

use subc::models::OutcomeKind;
use subc::{
    ConversionReport, ConversionRequest, ConversionTarget, ConvertOptions, Converter, Settings,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Clash configuration (YAML)
    Clash,
    /// Re-encoded link list
    Base64,
}

impl From<Mode> for ConversionTarget {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Clash => ConversionTarget::ClashYaml,
            Mode::Base64 => ConversionTarget::Base64Links,
        }
    }
}

/// Convert proxy subscription links into a Clash config or a link list
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Output format
    #[arg(value_enum)]
    mode: Mode,

    /// Subscription file, one link per line (or one Base64 body)
    source: PathBuf,

    /// The literal word `to`
    #[arg(value_name = "to", value_parser = ["to"])]
    #[allow(dead_code)]
    keyword: String,

    /// Output file, parent directories are created as needed
    destination: PathBuf,

    /// Settings file (.toml, .yaml or .yml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Wrap the link list in one Base64 body (base64 mode only)
    #[arg(long)]
    wrap: bool,
}

fn load_settings(path: Option<&PathBuf>) -> anyhow::Result<Settings> {
    match path {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display())),
        None => Ok(Settings::default()),
    }
}

fn print_report(report: &ConversionReport) {
    println!(
        "{}: {} converted, {} warnings, {} errors",
        report.status, report.tally.success, report.tally.warning, report.tally.error
    );

    for outcome in &report.outcomes {
        if outcome.kind != OutcomeKind::Success {
            println!("  line {}: {}", outcome.line, outcome.message);
        }
    }
    for skipped in &report.skipped {
        println!("  skipped {}", skipped);
    }
}

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let args = Args::parse();
    debug!("{:?}", args);

    let settings = match load_settings(args.config.as_ref()) {
        Ok(settings) => settings,
        Err(e) => {
            error!("{:#}", e);
            println!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let request = ConversionRequest::new(
        args.mode.into(),
        args.source,
        args.destination,
        ConvertOptions {
            wrap_base64: args.wrap,
        },
    );

    let mut converter = Converter::new(request, &settings);
    match converter.run() {
        Ok(report) => {
            print_report(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
