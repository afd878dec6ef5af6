//! JSON output formatter for duplicate scan results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "root": "/data",
//!   "examined": 5,
//!   "skipped": 1,
//!   "diagnostics": [
//!     { "path": "/data/locked.bin", "category": "PermissionDenied", "message": "..." }
//!   ],
//!   "duplicate_groups": [
//!     {
//!       "hash": "abc123...",
//!       "size": 1024,
//!       "count": 2,
//!       "wasted_space": 1024,
//!       "files": ["/data/file1.txt", "/data/file2.txt"]
//!     }
//!   ]
//! }
//! ```

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::duplicates::{DuplicateGroup, ScanStats};
use crate::scanner::Diagnostic;

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// BLAKE3 hash as hexadecimal string (64 characters)
    pub hash: String,
    /// File size in bytes
    pub size: u64,
    /// Number of files in the group
    pub count: usize,
    /// Bytes taken up by every copy beyond the first
    pub wasted_space: u64,
    /// Paths to all duplicate files
    pub files: Vec<String>,
}

impl JsonDuplicateGroup {
    /// Create a JSON duplicate group from a DuplicateGroup.
    #[must_use]
    pub fn from_duplicate_group(group: &DuplicateGroup) -> Self {
        Self {
            hash: group.hash_hex(),
            size: group.size,
            count: group.len(),
            wasted_space: group.wasted_space(),
            files: group
                .files
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Directory that was scanned
    pub root: String,
    /// Regular files visited
    pub examined: usize,
    /// Files skipped because of I/O errors
    pub skipped: usize,
    /// One entry per skipped file
    pub diagnostics: Vec<Diagnostic>,
    /// List of duplicate groups
    pub duplicate_groups: Vec<JsonDuplicateGroup>,
}

/// Errors that can occur while writing JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// Serialization failed.
    #[error("Failed to serialize JSON: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing to the output failed.
    #[error("Failed to write JSON output: {0}")]
    Io(#[from] std::io::Error),
}

impl JsonOutput {
    /// Create a new JSON output from a completed scan.
    ///
    /// # Example
    ///
    /// ```
    /// use dupefinder::duplicates::{DuplicateGroup, ScanStats};
    /// use dupefinder::output::json::JsonOutput;
    /// use std::path::{Path, PathBuf};
    ///
    /// let groups = vec![DuplicateGroup::new(
    ///     [0u8; 32],
    ///     1024,
    ///     vec![PathBuf::from("/file1.txt"), PathBuf::from("/file2.txt")],
    /// )];
    ///
    /// let output = JsonOutput::new(Path::new("/"), &groups, &ScanStats::default());
    /// assert_eq!(output.duplicate_groups.len(), 1);
    /// ```
    #[must_use]
    pub fn new(root: &Path, groups: &[DuplicateGroup], stats: &ScanStats) -> Self {
        Self {
            root: root.to_string_lossy().into_owned(),
            examined: stats.examined,
            skipped: stats.skipped,
            diagnostics: stats.diagnostics.clone(),
            duplicate_groups: groups
                .iter()
                .filter(|g| g.len() > 1)
                .map(JsonDuplicateGroup::from_duplicate_group)
                .collect(),
        }
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty-printed JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), JsonOutputError> {
        serde_json::to_writer_pretty(&mut *writer, self)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}
