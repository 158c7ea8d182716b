pub mod discovery;
pub mod report;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for standardize-bvalue
#[derive(Parser, Debug)]
#[command(name = "standardize-bvalue")]
#[command(about = "Write vendor-specific diffusion b-values into DiffusionBValue (0018,9087)")]
#[command(version, disable_help_flag = true)]
pub struct Cli {
    /// This help message
    #[arg(short = 'h', long = "help")]
    pub help: bool,

    /// Recursively search folders
    #[arg(short, long)]
    pub recursive: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Format of the final report
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// DICOM files, folders or file patterns containing '?' or '*'
    #[arg(value_name = "PATH|PATTERN")]
    pub paths: Vec<PathBuf>,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}
