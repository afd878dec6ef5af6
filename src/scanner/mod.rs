//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Directory walking that never follows symbolic links
//! - Prefix and full-content hashing with BLAKE3
//! - Per-file diagnostics for recoverable I/O failures
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: BLAKE3 file hashing (bounded prefix and streaming full read)
//!
//! # Example
//!
//! ```no_run
//! use dupefinder::scanner::Walker;
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."));
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("{}", e.diagnostic()),
//!     }
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

// Re-export main types
pub use hasher::{hash_to_hex, FullHash, Hasher, PartialHash, PREHASH_SIZE};
pub use walker::Walker;

/// A regular file observed during traversal.
///
/// Holds the path and the byte size read from metadata at scan time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path to the file, rooted at the scanned directory
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl FileEntry {
    /// Create a new FileEntry.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Reading the metadata of a regular file failed.
    #[error("Failed to read metadata for {path}: {source}")]
    Metadata {
        /// File whose metadata could not be read
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A directory could not be listed.
    #[error("Failed to read directory {path}: {source}")]
    Walk {
        /// Directory (or entry) that failed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Metadata { path, .. } | Self::Walk { path, .. } => path,
        }
    }

    /// Whether this error concerns a regular file (as opposed to a directory listing).
    #[must_use]
    pub fn is_file_error(&self) -> bool {
        matches!(self, Self::Metadata { .. })
    }

    /// Build the user-facing diagnostic line for this error.
    #[must_use]
    pub fn diagnostic(&self) -> Diagnostic {
        match self {
            Self::Metadata { path, source } | Self::Walk { path, source } => {
                Diagnostic::from_io(path, source)
            }
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The file could not be opened.
    #[error("Failed to open {path}: {source}")]
    Open {
        /// File that failed to open
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Reading the file content failed part way through.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// File that failed to read
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl HashError {
    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Open { path, .. } | Self::Read { path, .. } => path,
        }
    }

    /// Build the user-facing diagnostic line for this error.
    #[must_use]
    pub fn diagnostic(&self) -> Diagnostic {
        match self {
            Self::Open { path, source } | Self::Read { path, source } => {
                Diagnostic::from_io(path, source)
            }
        }
    }
}

/// A recoverable per-file failure, reported to the user and then skipped.
///
/// Displays as `<filename> <ErrorCategory>: <message>`, where the category
/// is the [`io::ErrorKind`] name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Full path of the file that was skipped
    #[serde(serialize_with = "serialize_path_lossy")]
    pub path: PathBuf,
    /// Error category, e.g. `PermissionDenied` or `NotFound`
    pub category: String,
    /// Human-readable error message
    pub message: String,
}

impl Diagnostic {
    /// Build a diagnostic from an I/O error.
    #[must_use]
    pub fn from_io(path: &Path, error: &io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            category: format!("{:?}", error.kind()),
            message: error.to_string(),
        }
    }

    /// File name shown in the diagnostic line (falls back to the full path).
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map_or_else(|| self.path.to_string_lossy(), |n| n.to_string_lossy())
            .into_owned()
    }
}

fn serialize_path_lossy<S: serde::Serializer>(path: &Path, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&path.to_string_lossy())
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.file_name(), self.category, self.message)
    }
}
