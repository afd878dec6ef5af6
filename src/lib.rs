//! dupefinder - Duplicate File Finder
//!
//! Finds files with identical content under a directory tree using a
//! three-phase pipeline: group by size, then by a BLAKE3 hash of the first
//! 64 KiB, then by a BLAKE3 hash of the full content. Files are only ever
//! read; nothing is modified.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::{Cli, OutputFormat};
use crate::config::{Config, Settings};
use crate::duplicates::{validate_root, DuplicateFinder, FinderConfig};
use crate::error::ExitCode;
use crate::output::{write_startup_line, JsonOutput, TextOutput};
use crate::progress::Progress;

/// Run a complete scan as described by `cli` and print the report to stdout.
///
/// # Errors
///
/// Returns [`duplicates::FinderError`] (wrapped in `anyhow`) when the root is
/// unusable, or another error when the config file or stdout fails.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    validate_root(&cli.path)?;

    let config = Config::resolve(cli.config.as_deref())?;
    let settings = Settings::merge(&config, &cli);
    log::debug!("Effective settings: {:?}", settings);

    let text_mode = cli.output == OutputFormat::Text;
    let stdout = io::stdout();

    if text_mode {
        write_startup_line(&mut stdout.lock(), &cli.path)
            .context("Failed to write to stdout")?;
    }

    let progress = Arc::new(Progress::new(
        !(settings.show_progress && text_mode),
        text_mode,
    ));
    let finder_config = FinderConfig::default()
        .with_io_threads(settings.io_threads)
        .with_progress_callback(progress);
    let finder = DuplicateFinder::new(finder_config);

    let (groups, stats) = finder.find_duplicates(&cli.path)?;

    let mut out = stdout.lock();
    match cli.output {
        OutputFormat::Text => TextOutput::new(&groups, &stats)
            .write_to(&mut out)
            .context("Failed to write report")?,
        OutputFormat::Json => JsonOutput::new(&cli.path, &groups, &stats)
            .write_to(&mut out)
            .context("Failed to write report")?,
    }
    out.flush().context("Failed to write report")?;

    Ok(ExitCode::Success)
}
