use super::ReadAt;
use std::io::{self, Read, Seek, SeekFrom};

/// Random access over any seekable stream, such as an in-memory cursor
pub struct StreamReader<R: Read + Seek> {
    inner: R,
    size: u64,
}

impl<R: Read + Seek> StreamReader<R> {
    /// Wrap a stream, measuring its length by seeking to the end
    pub fn new(mut inner: R) -> io::Result<Self> {
        let size = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self { inner, size })
    }
}

impl<R: Read + Seek> ReadAt for StreamReader<R> {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.seek(SeekFrom::Start(offset))?;
        self.inner.read(buf)
    }

    fn size(&self) -> u64 {
        self.size
    }
}
