//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based file grouping (Phase 1)
//! - Prehash comparison (Phase 2)
//! - Full hash comparison (Phase 3)
//! - Duplicate group management and scan statistics

pub mod finder;
pub mod groups;

pub use finder::{
    collect_duplicates, phase2_prehash, phase3_fullhash, validate_root, DuplicateFinder,
    FinderConfig, FinderError, DEFAULT_IO_THREADS,
};
pub use groups::{
    group_by_size, DuplicateGroup, FullHashGroups, PartialHashGroups, ScanStats, SizeGroups,
};
