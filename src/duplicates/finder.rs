//! Duplicate finder implementation with multi-phase detection.
//!
//! # Overview
//!
//! This module orchestrates the duplicate detection pipeline:
//! 1. **Phase 1 - Size grouping**: Group files by size (see [`crate::duplicates::groups`] module)
//! 2. **Phase 2 - Prehash**: Hash the first 64 KiB of same-size files
//! 3. **Phase 3 - Full hash**: Hash entire content of prehash matches
//!
//! Each phase fully consumes the previous phase's output before it starts.
//! A file whose size is unique is never opened, and a file whose prehash is
//! unique within its size is never read past its prefix.
//!
//! # Example
//!
//! ```no_run
//! use dupefinder::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default().with_io_threads(2));
//! let (groups, stats) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! println!("{} file(s) examined, {} duplicate group(s)", stats.examined, groups.len());
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use super::groups::{
    group_by_size, DuplicateGroup, FullHashGroups, PartialHashGroups, ScanStats, SizeGroups,
};
use crate::progress::ProgressCallback;
use crate::scanner::{hash_to_hex, FileEntry, HashError, Hasher, Walker};

/// Default number of hashing workers.
pub const DEFAULT_IO_THREADS: usize = 4;

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Number of I/O threads for parallel hashing.
    /// Default is 4 to prevent disk thrashing; 1 hashes sequentially.
    pub io_threads: usize,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("io_threads", &self.io_threads)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            io_threads: DEFAULT_IO_THREADS,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the I/O thread count (at least 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn progress(&self) -> Option<&dyn ProgressCallback> {
        self.progress_callback.as_deref()
    }
}

/// Errors that stop a scan before it starts.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a valid directory: {0}")]
    NotADirectory(PathBuf),
}

/// Check that `path` is an existing directory.
///
/// # Errors
///
/// Returns [`FinderError::PathNotFound`] or [`FinderError::NotADirectory`].
pub fn validate_root(path: &Path) -> Result<(), FinderError> {
    if !path.exists() {
        return Err(FinderError::PathNotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(FinderError::NotADirectory(path.to_path_buf()));
    }
    Ok(())
}

/// Hash every file on a bounded worker pool, keeping input order.
///
/// Each worker opens one file at a time; results are returned to the caller
/// for aggregation.
fn hash_files<T, F>(
    files: Vec<FileEntry>,
    io_threads: usize,
    progress: Option<&dyn ProgressCallback>,
    hash: F,
) -> Vec<(FileEntry, Result<T, HashError>)>
where
    T: Send,
    F: Fn(&Path) -> Result<T, HashError> + Sync,
{
    let done = AtomicUsize::new(0);
    let work = || {
        files
            .into_par_iter()
            .map(|file| {
                let result = hash(&file.path);
                let current = done.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(progress) = progress {
                    progress.on_progress(current, &file.path.to_string_lossy());
                }
                (file, result)
            })
            .collect::<Vec<_>>()
    };

    match rayon::ThreadPoolBuilder::new()
        .num_threads(io_threads.max(1))
        .build()
    {
        Ok(pool) => pool.install(work),
        Err(e) => {
            log::warn!(
                "Failed to create hashing pool, using global pool with {} threads: {}",
                rayon::current_num_threads(),
                e
            );
            work()
        }
    }
}

/// Flatten the groups holding two or more files, ordered by group key.
///
/// Files are opened, and skips recorded, in this order, so it must not
/// depend on map iteration order.
fn ordered_candidates<K: Ord>(groups: HashMap<K, Vec<FileEntry>>) -> Vec<FileEntry> {
    let mut groups: Vec<(K, Vec<FileEntry>)> = groups
        .into_iter()
        .filter(|(_, files)| files.len() > 1)
        .collect();
    groups.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
    groups.into_iter().flat_map(|(_, files)| files).collect()
}

/// Group same-size files by prefix digest (Phase 2).
///
/// Sizes with a single file are skipped without opening the file. A file
/// that fails to hash is recorded as skipped and left out of the output;
/// the rest of its group is still hashed.
pub fn phase2_prehash(
    size_groups: SizeGroups,
    hasher: &Hasher,
    config: &FinderConfig,
    stats: &mut ScanStats,
) -> PartialHashGroups {
    let progress = config.progress();
    let candidates = ordered_candidates(size_groups);

    if candidates.is_empty() {
        log::debug!("Phase 2: No files to process");
        return PartialHashGroups::new();
    }

    if let Some(progress) = progress {
        progress.on_phase_start("prehash", candidates.len());
    }
    log::info!("Phase 2: Computing prehashes for {} files", candidates.len());

    let results = hash_files(candidates, config.io_threads, progress, |path| {
        hasher.prehash(path)
    });

    let mut groups = PartialHashGroups::new();
    for (file, result) in results {
        match result {
            Ok(digest) => groups.entry((file.size, digest)).or_default().push(file),
            Err(e) => {
                log::debug!("Prehash failed: {}", e);
                stats.record_skip(e.diagnostic(), progress);
            }
        }
    }

    stats.eliminated_by_prehash = groups.values().filter(|files| files.len() == 1).count();

    if let Some(progress) = progress {
        progress.on_phase_end("prehash");
    }
    log::info!(
        "Phase 2 complete: {} prehash groups, {} files eliminated",
        groups.len(),
        stats.eliminated_by_prehash
    );

    groups
}

/// Group prehash matches by full-content digest (Phase 3).
///
/// Keys with a single file are skipped. Failure handling matches Phase 2.
pub fn phase3_fullhash(
    partial_groups: PartialHashGroups,
    hasher: &Hasher,
    config: &FinderConfig,
    stats: &mut ScanStats,
) -> FullHashGroups {
    let progress = config.progress();
    let candidates = ordered_candidates(partial_groups);

    if candidates.is_empty() {
        log::debug!("Phase 3: No files to process");
        return FullHashGroups::new();
    }

    if let Some(progress) = progress {
        progress.on_phase_start("fullhash", candidates.len());
    }
    log::info!("Phase 3: Computing full hashes for {} files", candidates.len());

    let results = hash_files(candidates, config.io_threads, progress, |path| {
        hasher.full_hash(path)
    });

    let mut groups = FullHashGroups::new();
    for (file, result) in results {
        match result {
            Ok(digest) => {
                stats.fully_hashed += 1;
                groups.entry(digest).or_default().push(file);
            }
            Err(e) => {
                log::debug!("Full hash failed: {}", e);
                stats.record_skip(e.diagnostic(), progress);
            }
        }
    }

    if let Some(progress) = progress {
        progress.on_phase_end("fullhash");
    }
    log::info!(
        "Phase 3 complete: {} files hashed into {} groups",
        stats.fully_hashed,
        groups.len()
    );

    groups
}

/// Turn full-hash groups into reported duplicate groups.
///
/// Keeps groups with two or more files, ordered by size (largest first)
/// and then by first path.
#[must_use]
pub fn collect_duplicates(full_groups: FullHashGroups) -> Vec<DuplicateGroup> {
    let mut groups: Vec<DuplicateGroup> = full_groups
        .into_iter()
        .filter(|(_, files)| files.len() > 1)
        .map(|(hash, files)| {
            let size = files.first().map_or(0, |f| f.size);
            log::debug!(
                "Duplicate group {}: {} files, {} bytes each",
                hash_to_hex(&hash),
                files.len(),
                size
            );
            DuplicateGroup::new(hash, size, files.into_iter().map(|f| f.path).collect())
        })
        .collect();

    groups.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.files.cmp(&b.files)));
    groups
}

/// Duplicate finder that orchestrates the multi-phase detection pipeline.
///
/// Runs Grouping, PartialHashing and FullHashing once each, in order, and
/// returns the confirmed duplicate groups with the accumulated
/// [`ScanStats`]. Per-file I/O failures never abort a scan.
#[derive(Debug)]
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self {
            config,
            hasher: Hasher::new(),
        }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Find all duplicate files under `root`.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError`] if `root` does not exist or is not a
    /// directory. Nothing else fails the scan.
    pub fn find_duplicates(
        &self,
        root: &Path,
    ) -> Result<(Vec<DuplicateGroup>, ScanStats), FinderError> {
        validate_root(root)?;
        log::info!("Starting duplicate scan of {}", root.display());

        let progress = self.config.progress();
        let mut stats = ScanStats::default();

        if let Some(progress) = progress {
            progress.on_phase_start("walking", 0);
        }
        let walker = Walker::new(root);
        let size_groups = group_by_size(walker.walk(), &mut stats, progress);
        if let Some(progress) = progress {
            progress.on_phase_end("walking");
        }

        let groups = self.hash_phases(size_groups, &mut stats);
        Ok((groups, stats))
    }

    /// Find duplicates among an already collected list of files.
    ///
    /// Every entry counts as examined, as if a walk had produced it.
    #[must_use]
    pub fn find_duplicates_from_files(
        &self,
        files: Vec<FileEntry>,
    ) -> (Vec<DuplicateGroup>, ScanStats) {
        let mut stats = ScanStats::default();
        let size_groups = group_by_size(files.into_iter().map(Ok), &mut stats, None);
        let groups = self.hash_phases(size_groups, &mut stats);
        (groups, stats)
    }

    fn hash_phases(&self, size_groups: SizeGroups, stats: &mut ScanStats) -> Vec<DuplicateGroup> {
        let partial = phase2_prehash(size_groups, &self.hasher, &self.config, stats);
        let full = phase3_fullhash(partial, &self.hasher, &self.config, stats);
        let groups = collect_duplicates(full);

        log::info!(
            "Scan complete: {} examined, {} skipped, {} duplicate groups",
            stats.examined,
            stats.skipped,
            groups.len()
        );
        groups
    }
}
