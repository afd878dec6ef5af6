//! Plain-text report for terminal output.
//!
//! # Format
//!
//! ```text
//! 5 file(s) examined (1 skipped due to errors)
//! 2 duplicates with hash 1f3a...:
//!   /data/a.txt
//!   /data/copy/a.txt
//!
//! ```
//!
//! When no duplicate group exists and more than one file was examined, a
//! final `No duplicates found` line is printed. With zero or one file
//! nothing extra is printed, since a single file cannot have a duplicate.

use std::io::{self, Write};
use std::path::Path;

use crate::duplicates::{DuplicateGroup, ScanStats};

/// Text report over the result of a completed scan.
#[derive(Debug, Clone, Copy)]
pub struct TextOutput<'a> {
    groups: &'a [DuplicateGroup],
    stats: &'a ScanStats,
}

impl<'a> TextOutput<'a> {
    /// Create a new text report.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup], stats: &'a ScanStats) -> Self {
        Self { groups, stats }
    }

    /// Write the report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `writer` fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write!(writer, "{} file(s) examined", self.stats.examined)?;
        if self.stats.skipped > 0 {
            write!(writer, " ({} skipped due to errors)", self.stats.skipped)?;
        }
        writeln!(writer)?;

        let mut found = false;
        for group in self.groups.iter().filter(|g| g.len() > 1) {
            found = true;
            writeln!(
                writer,
                "{} duplicates with hash {}:",
                group.len(),
                group.hash_hex()
            )?;
            for path in &group.files {
                writeln!(writer, "  {}", path.display())?;
            }
            writeln!(writer)?;
        }

        if !found && self.stats.examined > 1 {
            writeln!(writer, "No duplicates found")?;
        }

        writer.flush()
    }

    /// Render the report to a string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut buffer = Vec::new();
        // Writing to a Vec cannot fail.
        let _ = self.write_to(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

/// Write the line announcing which directory is being scanned.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_startup_line<W: Write>(writer: &mut W, root: &Path) -> io::Result<()> {
    writeln!(writer, "Scanning {} ...", root.display())?;
    writer.flush()
}
