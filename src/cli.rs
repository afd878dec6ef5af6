//! Command-line interface definitions for dupefinder.
//!
//! This module defines all CLI arguments and options using the clap derive API.
//!
//! # Example
//!
//! ```bash
//! # Scan a directory and print a text report
//! dupefinder ~/Downloads
//!
//! # JSON output for scripting
//! dupefinder ~/Downloads --output json
//!
//! # Hash sequentially, no progress bars, debug logging
//! dupefinder -v --io-threads 1 --no-progress ~/Downloads
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Find duplicate files by content.
///
/// Files are grouped by size, then by a hash of their first 64 KiB, and
/// finally confirmed by a hash of their full content. Nothing is modified.
#[derive(Debug, Parser)]
#[command(name = "dupefinder")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan for duplicates
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Increase verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress log output except errors, and hide progress bars
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Number of I/O threads for hashing (default: 4)
    ///
    /// Use 1 to hash files one at a time.
    #[arg(long, value_name = "N", env = "DUPEFINDER_IO_THREADS")]
    pub io_threads: Option<usize>,

    /// Do not draw progress bars
    #[arg(long, env = "DUPEFINDER_NO_PROGRESS")]
    pub no_progress: bool,

    /// Read settings from this JSON file instead of the default location
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report on stdout
    Text,
    /// JSON document on stdout
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
