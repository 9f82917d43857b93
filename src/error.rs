//! Error types for tar traversal, listing and extraction.
//!
//! Every kind except [`Error::NotFound`] is fatal: the run stops at the point
//! of failure and no missing-name report is produced. `NotFound` only exists
//! so a failed [`Outcome`](crate::Outcome) can be turned into an error after
//! a complete traversal.

use std::io;

/// Errors produced while reading a tar archive
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The first header block does not carry the ustar tag
    #[error("This does not look like a tar archive")]
    NotAnArchive,

    /// A short block, or a scan offset past the end of the source
    #[error("Unexpected EOF in archive (offset {offset})")]
    UnexpectedEof { offset: u64 },

    /// A block starting with NUL that is not entirely zero
    #[error("Malformed zero block {block}")]
    MalformedBlock { block: u64 },

    /// A numeric header field that cannot be decoded
    #[error("Invalid header at offset {offset}: {reason}")]
    InvalidHeader { offset: u64, reason: String },

    /// The stored header checksum does not match the header bytes
    #[error("{name}: Header checksum mismatch (stored {stored:o}, computed {computed:o})")]
    ChecksumMismatch {
        name: String,
        stored: u64,
        computed: u64,
    },

    /// An entry that is not a regular file
    #[error("Unsupported header type: {typeflag}")]
    UnsupportedType { name: String, typeflag: u8 },

    /// A member name that would escape the extraction directory
    #[error("{name}: Member name contains '..'")]
    UnsafePath { name: String },

    /// Requested names left unmatched after a full traversal
    #[error("{} requested name(s) not found in archive", .missing.len())]
    NotFound { missing: Vec<String> },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Whether the error aborted traversal, as opposed to a soft failure
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::NotFound { .. })
    }
}

/// Result type alias using this crate's [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = Error::UnsupportedType {
            name: "link".into(),
            typeflag: b'2',
        };
        assert_eq!(err.to_string(), "Unsupported header type: 50");

        let err = Error::NotFound {
            missing: vec!["a".into(), "b".into()],
        };
        assert_eq!(err.to_string(), "2 requested name(s) not found in archive");
        assert!(!err.is_fatal());
        assert!(Error::MalformedBlock { block: 3 }.is_fatal());
    }
}
