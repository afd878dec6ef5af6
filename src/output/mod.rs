//! Output formatters for duplicate scan results.
//!
//! This module provides the two report formats:
//! - Plain text for people at a terminal
//! - JSON for automation and scripting
//!
//! # Example
//!
//! ```no_run
//! use dupefinder::duplicates::DuplicateFinder;
//! use dupefinder::output::TextOutput;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, stats) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! print!("{}", TextOutput::new(&groups, &stats).render());
//! ```

pub mod json;
pub mod text;

// Re-export main types
pub use json::{JsonOutput, JsonOutputError};
pub use text::{write_startup_line, TextOutput};
