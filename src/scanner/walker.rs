//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory
//! tree and reading the size of every regular file in it.
//!
//! - Recurses into subdirectories
//! - Never follows symbolic links, so link cycles cannot loop
//! - Skips symlinks and non-regular files (devices, sockets, FIFOs) silently
//! - Visits entries sorted by file name, so output is stable across runs
//! - Yields metadata failures as [`ScanError`] values instead of stopping
//!
//! # Example
//!
//! ```no_run
//! use dupefinder::scanner::Walker;
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"));
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::io;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::{FileEntry, ScanError};

/// Directory walker for file discovery.
#[derive(Debug, Clone)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
}

impl Walker {
    /// Create a new walker for the given path.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            root: path.to_path_buf(),
        }
    }

    /// Root directory this walker starts from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the directory tree, yielding one item per regular file.
    ///
    /// Every regular file produces exactly one item: `Ok` with its size, or
    /// `Err(ScanError::Metadata)` if its size could not be read. Directories
    /// that cannot be listed produce `Err(ScanError::Walk)`. Zero-byte files
    /// are yielded like any other; excluding them is the grouper's job.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) => Self::process_entry(entry),
                Err(e) => Some(Err(self.handle_walk_error(e))),
            })
    }

    /// Turn a directory entry into a file entry, skipping anything that is
    /// not a regular file.
    fn process_entry(entry: DirEntry) -> Option<Result<FileEntry, ScanError>> {
        let file_type = entry.file_type();

        if file_type.is_symlink() {
            log::trace!("Skipping symlink: {}", entry.path().display());
            return None;
        }
        if !file_type.is_file() {
            if !file_type.is_dir() {
                log::trace!("Skipping non-regular file: {}", entry.path().display());
            }
            return None;
        }

        // Not following links, so this is lstat and never leaves the tree.
        match entry.metadata() {
            Ok(metadata) => Some(Ok(FileEntry::new(entry.into_path(), metadata.len()))),
            Err(e) => {
                let path = entry.into_path();
                log::debug!("Metadata failed for {}: {}", path.display(), e);
                Some(Err(ScanError::Metadata {
                    path,
                    source: into_io_error(e),
                }))
            }
        }
    }

    fn handle_walk_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);
        log::debug!("Walker error for {}: {}", path.display(), error);
        let depth = error.depth();
        let source = into_io_error(error);
        if is_directory_error(depth, &path) {
            ScanError::Walk { path, source }
        } else {
            ScanError::Metadata { path, source }
        }
    }
}

/// Whether a traversal error concerns a directory rather than a file.
///
/// The root and anything that is still a directory count as directories.
/// Other entries below the root are files whose type or metadata could not
/// be read.
fn is_directory_error(depth: usize, path: &Path) -> bool {
    depth == 0 || path.is_dir()
}

fn into_io_error(error: walkdir::Error) -> io::Error {
    let message = error.to_string();
    error
        .into_io_error()
        .unwrap_or_else(|| io::Error::other(message))
}
