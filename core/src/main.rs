use bvalue_core::cli::discovery::resolve_inputs;
use bvalue_core::cli::{Cli, OutputFormat};
use bvalue_core::{BValueStandardizer, BatchReport};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use log::{info, warn};
use std::process;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::DisplayVersion => e.exit(),
        Err(e) => {
            eprintln!("{}", e);
            usage()
        }
    };

    if cli.help || cli.paths.is_empty() {
        usage();
    }

    setup_logging(cli.verbose);

    let files = resolve_inputs(&cli.paths, cli.recursive);
    if files.is_empty() {
        warn!("No files found");
    }

    let standardizer = BValueStandardizer::default();
    let reports = standardizer.standardize_files(&files);
    let report = BatchReport::new(&reports);

    match cli.format {
        OutputFormat::Text => print!("{}", report),
        OutputFormat::Json => {
            #[cfg(feature = "json")]
            {
                match report.to_json() {
                    Ok(json) => println!("{}", json),
                    Err(e) => eprintln!("Error: Failed to serialize report: {}", e),
                }
            }
            #[cfg(not(feature = "json"))]
            {
                eprintln!("Error: JSON output requires the 'json' feature");
                eprintln!("Rebuild with: cargo build --features json");
            }
        }
    }

    info!("Done.");
}

fn usage() -> ! {
    let mut command = Cli::command();
    eprintln!("{}", command.render_help());
    process::exit(1);
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}
