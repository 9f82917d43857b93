//! Tar archive traversal, listing and extraction.
//!
//! This module reads POSIX ustar archives from any source that implements
//! [`ReadAt`](crate::io::ReadAt) and handles regular files only.
//!
//! ## Architecture
//!
//! - [`header`]: decoding of the fixed 512-byte header layout
//! - [`archive`]: the block-by-block entry iterator
//! - [`selector`]: matching entry names against requested names
//! - [`extractor`]: listing and extraction built on the iterator
//!
//! ## Tar Format Overview
//!
//! A tar archive is a sequence of 512-byte blocks:
//! 1. Each entry is one header block followed by `ceil(size / 512)` data blocks
//! 2. Data is padded with zeros up to the block boundary
//! 3. Two all-zero blocks mark the end of the archive
//!
//! ## Limitations
//!
//! - Only regular files; directories, links and devices abort the run
//! - No PAX, GNU long-name or sparse headers
//! - No compression

mod archive;
mod extractor;
mod header;
mod selector;
#[cfg(test)]
mod testutil;

pub use archive::{Archive, Entry};
pub use extractor::{Outcome, TarExtractor};
pub use header::{BLOCK_SIZE, Header, TypeFlag, validate_tag};
pub use selector::Selector;

use std::io::Write;

use crate::config::Config;
use crate::error::Result;
use crate::io::ReadAt;

/// List the selected entries of an archive, one name per line on `out`.
///
/// Unmatched requested names are reported on `diag` once the whole archive
/// has been read and make the returned [`Outcome`] a failure.
pub fn list<R, W, D>(source: R, config: &Config, out: &mut W, diag: &mut D) -> Result<Outcome>
where
    R: ReadAt,
    W: Write + ?Sized,
    D: Write + ?Sized,
{
    TarExtractor::new(source, config)?.list(out, diag)
}

/// Extract the selected entries of an archive.
///
/// Files land under `config.directory`, or the current directory. Matched
/// names are echoed on `out` when `config.verbose` is set.
pub fn extract<R, W, D>(source: R, config: &Config, out: &mut W, diag: &mut D) -> Result<Outcome>
where
    R: ReadAt,
    W: Write + ?Sized,
    D: Write + ?Sized,
{
    TarExtractor::new(source, config)?.extract(out, diag)
}
