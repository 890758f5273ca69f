//! qllt-expand CLI
//!
//! Usage:
//!   qllt-expand [OPTIONS] <ROOT>
//!
//! Options:
//!   -c, --config <FILE>  Configuration file (TOML format)
//!       --check          Verify generated files instead of writing them
//!   -h, --help           Print help

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use qllt_expand::{check_with_config, expand_with_config, ExpandConfig, ExpandError};

#[derive(Parser)]
#[command(name = "qllt-expand")]
#[command(about = "Expand parameterized .qllt templates into generated .qll modules")]
struct Cli {
    /// Library root to scan for templates
    root: PathBuf,

    /// Configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verify that generated files are up to date without writing them
    #[arg(long)]
    check: bool,
}

fn main() {
    let cli = Cli::parse();

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let config = match &cli.config {
        Some(path) => match ExpandConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => ExpandConfig::default(),
    };

    if cli.check {
        match check_with_config(&cli.root, &config) {
            Ok(report) => {
                for path in &report.missing {
                    eprintln!("missing: {}", path.display());
                }
                for path in &report.stale {
                    eprintln!("stale: {}", path.display());
                }
                if !report.is_clean() {
                    eprintln!("Generated files are out of date; rerun without --check");
                    std::process::exit(1);
                }
            }
            Err(e) => fail(e),
        }
        return;
    }

    match expand_with_config(&cli.root, &config) {
        Ok(report) => {
            for path in &report.written {
                println!("{}", path.display());
            }
        }
        Err(e) => fail(e),
    }
}

/// Print a diagnostic for a failed run and exit
fn fail(err: ExpandError) -> ! {
    if let ExpandError::Parse(parse_err) = &err {
        let path = parse_err.path();
        if let Ok(source) = fs::read_to_string(path) {
            eprint!("{}", parse_err.format(&source, &path.display().to_string()));
        }
    }
    eprintln!("Error: {}", err);
    std::process::exit(1);
}
