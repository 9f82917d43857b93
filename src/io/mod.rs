mod local;
mod stream;

pub use local::LocalFileReader;
pub use stream::StreamReader;

use std::io;

/// Trait for random access reading from a data source
pub trait ReadAt {
    /// Read data at the specified offset into the buffer
    ///
    /// Returns the number of bytes read, which may be less than `buf.len()`.
    /// A return value of 0 means the offset is at or past the end of the source.
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize>;

    /// Get the total size of the data source
    fn size(&self) -> u64;

    /// Fill as much of `buf` as the source allows, starting at `offset`
    ///
    /// Stops early only when the source is exhausted, so a short count
    /// always means end of data.
    fn read_full_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read_at(offset + filled as u64, &mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}
