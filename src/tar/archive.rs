//! Sequential traversal of tar blocks.
//!
//! [`Archive`] walks the source one record at a time: a header block, then
//! `ceil(size / 512)` data blocks, until two consecutive zero blocks mark the
//! end. The scan offset only ever moves by whole blocks.
//!
//! ## Truncated data
//!
//! When a header announces more data than the source holds, the entry is
//! still yielded and the following call to [`Archive::next_entry`] reports
//! [`Error::UnexpectedEof`]. Callers extracting that entry receive whatever
//! bytes exist.

use std::io::Write;

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::io::ReadAt;

use super::header::{self, BLOCK_SIZE, Header};

const BLOCK: u64 = BLOCK_SIZE as u64;

/// Chunk size used when copying entry data out of the archive
const COPY_CHUNK: usize = 64 * 1024;

/// A header together with where its data starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub header: Header,
    /// Byte offset of the first data block
    pub data_offset: u64,
}

impl Entry {
    /// Member name exactly as stored in the archive
    pub fn path_bytes(&self) -> Vec<u8> {
        self.header.path_bytes()
    }

    pub fn path(&self) -> String {
        self.header.path()
    }

    pub fn size(&self) -> u64 {
        self.header.size
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Scanning,
    EndOfArchive,
    Failed,
}

/// Tar traversal over an exclusively owned byte source.
///
/// The source is released when the archive is dropped, which happens once
/// whichever way the traversal ends.
pub struct Archive<R: ReadAt> {
    reader: R,
    /// Source length captured at open
    len: u64,
    /// Start of the next record, always block aligned
    offset: u64,
    state: State,
    verify_checksum: bool,
    lone_zero_block: Option<u64>,
}

impl<R: ReadAt> Archive<R> {
    pub fn new(reader: R) -> Self {
        let len = reader.size();
        Self {
            reader,
            len,
            offset: 0,
            state: State::Scanning,
            verify_checksum: false,
            lone_zero_block: None,
        }
    }

    /// Verify each header checksum while scanning
    pub fn verify_checksum(mut self, verify: bool) -> Self {
        self.verify_checksum = verify;
        self
    }

    /// Total length of the source
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Offset of the next record to scan
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// 1-based number of an unpaired terminating zero block, if one was seen
    pub fn lone_zero_block(&self) -> Option<u64> {
        self.lone_zero_block
    }

    /// Reject sources whose first header block lacks the ustar tag.
    ///
    /// Empty sources, short first blocks and leading zero blocks pass; the
    /// traversal itself reports those.
    pub fn check_tag(&mut self) -> Result<()> {
        let mut block = [0u8; BLOCK_SIZE];
        let n = self.reader.read_full_at(0, &mut block)?;
        if n == BLOCK_SIZE && block[0] != 0 && !header::validate_tag(&block) {
            debug!("first block has magic {:?}", &block[257..263]);
            return Err(Error::NotAnArchive);
        }
        Ok(())
    }

    /// Advance to the next entry.
    ///
    /// Returns `Ok(None)` at the end of the archive. After the end, or after
    /// an error, every further call returns `Ok(None)`.
    pub fn next_entry(&mut self) -> Result<Option<Entry>> {
        if self.state != State::Scanning {
            return Ok(None);
        }

        match self.scan() {
            Ok(Some(entry)) => Ok(Some(entry)),
            Ok(None) => {
                self.state = State::EndOfArchive;
                Ok(None)
            }
            Err(e) => {
                self.state = State::Failed;
                Err(e)
            }
        }
    }

    fn scan(&mut self) -> Result<Option<Entry>> {
        if self.offset > self.len {
            return Err(Error::UnexpectedEof {
                offset: self.offset,
            });
        }

        let mut block = [0u8; BLOCK_SIZE];
        let n = self.reader.read_full_at(self.offset, &mut block)?;
        trace!("read {} bytes at offset {}", n, self.offset);

        if n == 0 {
            debug!("source ends at {} without a terminator", self.offset);
            return Ok(None);
        }
        if n < BLOCK_SIZE {
            return Err(Error::UnexpectedEof {
                offset: self.offset + n as u64,
            });
        }

        if block[0] != 0 {
            return self.header_record(&block).map(Some);
        }

        if !header::is_zero_block(&block) {
            return Err(Error::MalformedBlock {
                block: self.offset / BLOCK + 1,
            });
        }

        let first = self.offset / BLOCK + 1;
        self.offset += BLOCK;

        let n = self.reader.read_full_at(self.offset, &mut block)?;
        if n == BLOCK_SIZE && header::is_zero_block(&block) {
            self.offset += BLOCK;
        } else {
            debug!("lone zero block at {first}");
            self.lone_zero_block = Some(first);
        }
        debug!("end of archive at block {first}");

        Ok(None)
    }

    fn header_record(&mut self, block: &[u8; BLOCK_SIZE]) -> Result<Entry> {
        let header = Header::decode(block, self.offset)?;
        if self.verify_checksum {
            header.verify_checksum(block, self.offset)?;
        }

        let data_offset = self.offset + BLOCK;
        let data_blocks = header.data_blocks();

        // (1 + data_blocks) * 512 past the header, unless it cannot be represented
        self.offset = data_blocks
            .checked_add(1)
            .and_then(|blocks| blocks.checked_mul(BLOCK))
            .and_then(|span| self.offset.checked_add(span))
            .ok_or(Error::UnexpectedEof {
                offset: data_offset,
            })?;

        debug!(
            "entry {:?}: {} bytes in {} blocks at {}",
            header.path(),
            header.size,
            data_blocks,
            data_offset
        );
        if self.offset > self.len {
            debug!("entry {:?} runs past the end of the source", header.path());
        }

        Ok(Entry {
            header,
            data_offset,
        })
    }

    /// Copy an entry's data into `sink`.
    ///
    /// Copies up to `entry.size()` bytes, stopping early without error if the
    /// source ends first. Returns the number of bytes written.
    pub fn read_data<W: Write + ?Sized>(&mut self, entry: &Entry, sink: &mut W) -> Result<u64> {
        let size = entry.size();
        let mut buf = vec![0u8; size.min(COPY_CHUNK as u64) as usize];
        let mut copied = 0u64;

        while copied < size {
            let want = (size - copied).min(buf.len() as u64) as usize;
            let n = self
                .reader
                .read_full_at(entry.data_offset + copied, &mut buf[..want])?;
            sink.write_all(&buf[..n])?;
            copied += n as u64;
            if n < want {
                break;
            }
        }

        if copied < size {
            debug!(
                "entry {:?}: only {} of {} bytes available",
                entry.path(),
                copied,
                size
            );
        }
        Ok(copied)
    }
}
