//! BLAKE3 file hasher with streaming support.
//!
//! # Overview
//! This module provides the [`Hasher`] struct for computing BLAKE3 digests
//! of file contents. Two digests are produced:
//!
//! - [`Hasher::prehash`]: a 16-byte digest over at most the first
//!   [`PREHASH_SIZE`] bytes, used as a cheap pre-filter.
//! - [`Hasher::full_hash`]: a 32-byte digest over the entire content,
//!   streamed in fixed-size chunks so large files are never loaded whole.
//!
//! Both digests come from the same BLAKE3 output stream, so for a file no
//! longer than [`PREHASH_SIZE`] the prehash equals the first 16 bytes of the
//! full hash.
//!
//! File handles are scoped to a single call and dropped on every exit path.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use super::HashError;

/// Number of leading bytes covered by the prehash (64 KiB).
pub const PREHASH_SIZE: u64 = 64 * 1024;

/// Default read chunk size for streaming.
const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Digest over the first [`PREHASH_SIZE`] bytes of a file.
pub type PartialHash = [u8; 16];

/// Digest over the whole content of a file.
pub type FullHash = [u8; 32];

/// Streaming BLAKE3 hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    buffer_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default 64 KiB read buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Create a hasher with a custom read buffer size (minimum 1 byte).
    #[must_use]
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
        }
    }

    /// Read buffer size used for streaming.
    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Hash at most the first [`PREHASH_SIZE`] bytes of a file.
    ///
    /// Shorter files are hashed in full.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read.
    pub fn prehash(&self, path: &Path) -> Result<PartialHash, HashError> {
        let file = open(path)?;
        let mut hasher = blake3::Hasher::new();
        self.stream(path, file.take(PREHASH_SIZE), &mut hasher)?;

        let mut digest = PartialHash::default();
        hasher.finalize_xof().fill(&mut digest);
        Ok(digest)
    }

    /// Hash the entire content of a file.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read.
    pub fn full_hash(&self, path: &Path) -> Result<FullHash, HashError> {
        let file = open(path)?;
        let mut hasher = blake3::Hasher::new();
        let bytes = self.stream(path, file, &mut hasher)?;
        log::trace!("Hashed {} bytes: {}", bytes, path.display());
        Ok(*hasher.finalize().as_bytes())
    }

    fn stream(
        &self,
        path: &Path,
        mut reader: impl Read,
        hasher: &mut blake3::Hasher,
    ) -> Result<u64, HashError> {
        let mut buffer = vec![0u8; self.buffer_size];
        let mut total = 0u64;

        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => {
                    hasher.update(&buffer[..n]);
                    total += n as u64;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(HashError::Read {
                        path: path.to_path_buf(),
                        source,
                    })
                }
            }
        }

        Ok(total)
    }
}

fn open(path: &Path) -> Result<File, HashError> {
    File::open(path).map_err(|source| HashError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Render a digest as lowercase hex.
#[must_use]
pub fn hash_to_hex(hash: &[u8]) -> String {
    let mut hex = String::with_capacity(hash.len() * 2);
    for byte in hash {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}
