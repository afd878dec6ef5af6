//! Duplicate grouping, size-based file organization and scan statistics.
//!
//! # Overview
//!
//! This module provides the size grouping phase (Phase 1) of duplicate
//! detection, the [`ScanStats`] accumulator threaded through every phase, and
//! the [`DuplicateGroup`] type produced at the end of the pipeline.
//!
//! ## Size Grouping (Phase 1)
//!
//! Files with different sizes cannot be duplicates, so grouping by exact
//! size eliminates most files before any content is read. Zero-byte files
//! are never grouped: all empty files are identical, and they are not
//! reported as duplicates.
//!
//! # Example
//!
//! ```
//! use dupefinder::duplicates::{group_by_size, ScanStats};
//! use dupefinder::scanner::FileEntry;
//! use std::path::PathBuf;
//!
//! let files = vec![
//!     Ok(FileEntry::new(PathBuf::from("/a.txt"), 100)),
//!     Ok(FileEntry::new(PathBuf::from("/b.txt"), 100)),
//!     Ok(FileEntry::new(PathBuf::from("/c.txt"), 0)),
//! ];
//!
//! let mut stats = ScanStats::default();
//! let groups = group_by_size(files, &mut stats, None);
//!
//! assert_eq!(stats.examined, 3);
//! assert_eq!(groups[&100].len(), 2);
//! assert!(!groups.contains_key(&0));
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use crate::progress::ProgressCallback;
use crate::scanner::{hash_to_hex, Diagnostic, FileEntry, FullHash, PartialHash, ScanError};

/// Files keyed by exact byte size, in traversal order within each size.
pub type SizeGroups = HashMap<u64, Vec<FileEntry>>;

/// Files keyed by (size, prefix digest).
///
/// The size is part of the key because two files of different sizes can
/// share a prefix digest.
pub type PartialHashGroups = HashMap<(u64, PartialHash), Vec<FileEntry>>;

/// Files keyed by full-content digest.
pub type FullHashGroups = HashMap<FullHash, Vec<FileEntry>>;

/// Counters accumulated across all phases of a scan.
///
/// Passed by `&mut` into each phase; concurrent workers never touch it
/// directly, their results are folded in on the calling thread.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Regular files visited by the walk (including ones later skipped)
    pub examined: usize,
    /// Files excluded because of an I/O failure in any phase
    pub skipped: usize,
    /// Zero-byte files discarded during grouping
    pub empty_files: usize,
    /// Files eliminated because no other file had their size
    pub eliminated_by_size: usize,
    /// Files eliminated because no other file shared their prefix digest
    pub eliminated_by_prehash: usize,
    /// Files whose full content was hashed
    pub fully_hashed: usize,
    /// One entry per skipped file, in the order the failures were recorded
    pub diagnostics: Vec<Diagnostic>,
}

impl ScanStats {
    /// Record a skipped file and forward its diagnostic to the progress sink.
    pub fn record_skip(
        &mut self,
        diagnostic: Diagnostic,
        progress: Option<&dyn ProgressCallback>,
    ) {
        self.skipped += 1;
        if let Some(progress) = progress {
            progress.on_skipped(&diagnostic);
        }
        self.diagnostics.push(diagnostic);
    }
}

/// A confirmed set of two or more files with identical content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Full-content digest shared by every file
    pub hash: FullHash,
    /// Size of each file in bytes
    pub size: u64,
    /// Paths of the duplicate files, in traversal order
    pub files: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(hash: FullHash, size: u64, files: Vec<PathBuf>) -> Self {
        Self { hash, size, files }
    }

    /// Number of files in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the group has no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Bytes taken up by every copy beyond the first.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * (self.files.len().saturating_sub(1) as u64)
    }

    /// Digest as lowercase hex.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hash_to_hex(&self.hash)
    }
}

/// Group files by size (Phase 1 of duplicate detection).
///
/// Consumes the walker's output. Every item counts as examined; a
/// metadata failure is recorded as a skip and the item is dropped;
/// zero-byte files are dropped without a skip. Directory listing failures
/// are logged and not counted, since they are not files.
///
/// All sizes are returned, including sizes with a single file; Phase 2
/// ignores those.
pub fn group_by_size(
    entries: impl IntoIterator<Item = Result<FileEntry, ScanError>>,
    stats: &mut ScanStats,
    progress: Option<&dyn ProgressCallback>,
) -> SizeGroups {
    let mut groups = SizeGroups::new();

    for entry in entries {
        let file = match entry {
            Ok(file) => file,
            Err(e) if e.is_file_error() => {
                stats.examined += 1;
                if let Some(progress) = progress {
                    progress.on_progress(stats.examined, &e.path().to_string_lossy());
                }
                stats.record_skip(e.diagnostic(), progress);
                continue;
            }
            Err(e) => {
                log::warn!("{}", e);
                continue;
            }
        };

        stats.examined += 1;
        if let Some(progress) = progress {
            progress.on_progress(stats.examined, &file.path.to_string_lossy());
        }

        if file.size == 0 {
            stats.empty_files += 1;
            log::trace!("Empty file discarded: {}", file.path.display());
            continue;
        }

        groups.entry(file.size).or_default().push(file);
    }

    let (candidates, unique): (usize, usize) =
        groups.values().fold((0, 0), |(candidates, unique), files| {
            if files.len() > 1 {
                (candidates + files.len(), unique)
            } else {
                (candidates, unique + 1)
            }
        });
    stats.eliminated_by_size = unique;

    if stats.empty_files > 0 {
        log::debug!("Discarded {} empty file(s)", stats.empty_files);
    }
    log::info!(
        "Phase 1 complete: {} files examined, {} size candidates, {} unique sizes",
        stats.examined,
        candidates,
        unique
    );

    groups
}
