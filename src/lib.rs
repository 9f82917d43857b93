//! # untar
//!
//! A Rust tar utility that lists and extracts regular files from ustar
//! archives.
//!
//! The archive is read block by block from any source implementing
//! [`ReadAt`]. Entries can be filtered by an exact list of names; names that
//! never appear are reported once the archive has been read in full.
//!
//! ## Features
//!
//! - List or extract regular-file entries
//! - POSIX ustar and GNU tar headers, including base-256 sizes
//! - Optional header checksum verification
//! - Selection by exact name, with duplicate names matched one for one
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use untar::{Config, LocalFileReader};
//!
//! fn main() -> anyhow::Result<()> {
//!     let reader = LocalFileReader::new(Path::new("archive.tar"))?;
//!     let config = Config::new().requested(["a.txt"]);
//!
//!     let outcome = untar::list(reader, &config, &mut std::io::stdout(), &mut std::io::stderr())?;
//!     if !outcome.is_success() {
//!         eprintln!("missing: {:?}", outcome.missing);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod tar;

pub use crate::cli::Cli;
pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::io::{LocalFileReader, ReadAt, StreamReader};
pub use crate::tar::{Archive, Entry, Header, Outcome, TarExtractor, extract, list};
