//! Hand-built archive blocks for unit tests.

use super::header::{BLOCK_SIZE, compute_checksum};

/// Builds a single ustar header block with a valid checksum
pub struct HeaderBuilder {
    block: [u8; BLOCK_SIZE],
}

impl HeaderBuilder {
    pub fn new(name: impl AsRef<[u8]>) -> Self {
        let mut builder = Self {
            block: [0u8; BLOCK_SIZE],
        };
        builder.put(0, name.as_ref());
        builder.put(100, b"0000644\0");
        builder.put(108, b"0001750\0");
        builder.put(116, b"0001750\0");
        builder.put(136, b"14500000000\0");
        builder.block[156] = b'0';
        builder.put(257, b"ustar\0");
        builder.put(263, b"00");
        builder.put(265, b"user");
        builder.put(297, b"users");
        builder.size(0)
    }

    pub fn size(self, size: u64) -> Self {
        self.size_field(format!("{size:011o}\0").as_bytes())
    }

    pub fn size_field(mut self, raw: &[u8]) -> Self {
        self.block[124..136].fill(0);
        self.put(124, raw);
        self
    }

    /// Overwrite raw bytes starting at `at`, e.g. a numeric field
    pub fn field(mut self, at: usize, raw: &[u8]) -> Self {
        self.put(at, raw);
        self
    }

    pub fn typeflag(mut self, flag: u8) -> Self {
        self.block[156] = flag;
        self
    }

    pub fn magic(mut self, magic: &[u8; 6], version: &[u8; 2]) -> Self {
        self.put(257, magic);
        self.put(263, version);
        self
    }

    pub fn prefix(mut self, prefix: &str) -> Self {
        self.put(345, prefix.as_bytes());
        self
    }

    pub fn build(mut self) -> [u8; BLOCK_SIZE] {
        self.block[148..156].fill(b' ');
        let (sum, _) = compute_checksum(&self.block);
        self.put(148, format!("{sum:06o}\0 ").as_bytes());
        self.block
    }

    fn put(&mut self, at: usize, bytes: &[u8]) {
        self.block[at..at + bytes.len()].copy_from_slice(bytes);
    }
}

/// Header followed by `data` padded to a whole number of blocks
pub fn entry(header: [u8; BLOCK_SIZE], data: &[u8]) -> Vec<u8> {
    let mut out = header.to_vec();
    out.extend_from_slice(data);
    out.resize(out.len().next_multiple_of(BLOCK_SIZE), 0);
    out
}

/// Regular-file entries followed by the two-block terminator
pub fn archive(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut out = Vec::new();
    for (name, data) in files {
        let header = HeaderBuilder::new(name).size(data.len() as u64).build();
        out.extend(entry(header, data));
    }
    out.extend(zero_blocks(2));
    out
}

pub fn zero_blocks(count: usize) -> Vec<u8> {
    vec![0u8; count * BLOCK_SIZE]
}
