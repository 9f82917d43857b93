//! Fixed-layout ustar header decoding.
//!
//! Every field is read from its byte range in the 512-byte block; nothing
//! relies on the in-memory layout of a Rust struct.

use std::ops::Range;

use byteorder::{BigEndian, ByteOrder};

use crate::error::{Error, Result};

/// Archive storage unit
pub const BLOCK_SIZE: usize = 512;

/// Bytes of a header block covered by named fields; the rest is reserved
pub const HEADER_SIZE: usize = 500;

/// Tag shared by POSIX (`"ustar\0"`) and GNU (`"ustar "`) headers
pub const USTAR_TAG: &[u8] = b"ustar";

/// Exact POSIX magic, the only form whose `prefix` field holds a path
pub const POSIX_MAGIC: &[u8] = b"ustar\0";

const NAME: Range<usize> = 0..100;
const MODE: Range<usize> = 100..108;
const UID: Range<usize> = 108..116;
const GID: Range<usize> = 116..124;
const SIZE: Range<usize> = 124..136;
const MTIME: Range<usize> = 136..148;
const CHKSUM: Range<usize> = 148..156;
const TYPEFLAG: usize = 156;
const LINKNAME: Range<usize> = 157..257;
const MAGIC: Range<usize> = 257..263;
const VERSION: Range<usize> = 263..265;
const UNAME: Range<usize> = 265..297;
const GNAME: Range<usize> = 297..329;
const PREFIX: Range<usize> = 345..HEADER_SIZE;

/// Entry type recorded in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFlag {
    /// `'0'` or NUL
    Regular,
    Unsupported(u8),
}

impl TypeFlag {
    pub fn from_u8(value: u8) -> Self {
        match value {
            b'0' | 0 => TypeFlag::Regular,
            _ => TypeFlag::Unsupported(value),
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            TypeFlag::Regular => b'0',
            TypeFlag::Unsupported(v) => *v,
        }
    }

    pub fn is_regular(&self) -> bool {
        matches!(self, TypeFlag::Regular)
    }
}

/// Decoded header block.
///
/// `size` is the only numeric field traversal depends on, so it is the only
/// one decoded strictly. The others are `None` when their bytes do not hold
/// a value this reader understands, such as a pre-1970 GNU mtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Raw name bytes, up to the first NUL
    pub name: Vec<u8>,
    pub mode: Option<u64>,
    pub uid: Option<u64>,
    pub gid: Option<u64>,
    pub size: u64,
    pub mtime: Option<u64>,
    /// Checksum as stored, not verified
    pub checksum: Option<u64>,
    pub typeflag: TypeFlag,
    pub linkname: String,
    pub magic: [u8; 6],
    pub version: [u8; 2],
    pub uname: String,
    pub gname: String,
    /// Raw prefix bytes, joined to `name` for POSIX headers
    pub prefix: Vec<u8>,
}

impl Header {
    /// Decode a header block read at `offset`.
    ///
    /// Only the size field can fail. Names are kept as raw bytes; the other
    /// text fields stop at the first NUL and are decoded lossily. The block
    /// is not required to carry the ustar tag; see [`validate_tag`] for that
    /// check.
    pub fn decode(block: &[u8; BLOCK_SIZE], offset: u64) -> Result<Self> {
        let size = parse_numeric(&block[SIZE]).map_err(|reason| Error::InvalidHeader {
            offset,
            reason: format!("size field {reason}"),
        })?;
        let lenient = |range: Range<usize>| parse_numeric(&block[range]).ok();

        let mut magic = [0u8; 6];
        magic.copy_from_slice(&block[MAGIC]);
        let mut version = [0u8; 2];
        version.copy_from_slice(&block[VERSION]);

        Ok(Self {
            name: until_nul(&block[NAME]).to_vec(),
            mode: lenient(MODE),
            uid: lenient(UID),
            gid: lenient(GID),
            size,
            mtime: lenient(MTIME),
            checksum: lenient(CHKSUM),
            typeflag: TypeFlag::from_u8(block[TYPEFLAG]),
            linkname: parse_text(&block[LINKNAME]),
            magic,
            version,
            uname: parse_text(&block[UNAME]),
            gname: parse_text(&block[GNAME]),
            prefix: until_nul(&block[PREFIX]).to_vec(),
        })
    }

    /// Member path bytes: `prefix/name` for POSIX headers with a prefix, else `name`
    pub fn path_bytes(&self) -> Vec<u8> {
        if self.magic == POSIX_MAGIC && !self.prefix.is_empty() {
            [self.prefix.as_slice(), b"/", self.name.as_slice()].concat()
        } else {
            self.name.clone()
        }
    }

    /// Member path for messages and logs, lossily decoded
    pub fn path(&self) -> String {
        String::from_utf8_lossy(&self.path_bytes()).into_owned()
    }

    /// Number of data blocks following the header
    pub fn data_blocks(&self) -> u64 {
        self.size.div_ceil(BLOCK_SIZE as u64)
    }

    /// Check the stored checksum against the block it was decoded from.
    ///
    /// Accepts the unsigned sum and the historic signed-char sum. A checksum
    /// field that is not a number fails with [`Error::InvalidHeader`].
    pub fn verify_checksum(&self, block: &[u8; BLOCK_SIZE], offset: u64) -> Result<()> {
        let stored = parse_numeric(&block[CHKSUM]).map_err(|reason| Error::InvalidHeader {
            offset,
            reason: format!("checksum field {reason}"),
        })?;
        let (unsigned, signed) = compute_checksum(block);
        if stored == unsigned || i64::try_from(stored) == Ok(signed) {
            return Ok(());
        }
        Err(Error::ChecksumMismatch {
            name: self.path(),
            stored,
            computed: unsigned,
        })
    }
}

/// Whether the block's magic field starts with the ustar tag
pub fn validate_tag(block: &[u8]) -> bool {
    block
        .get(MAGIC)
        .is_some_and(|magic| magic.starts_with(USTAR_TAG))
}

/// Whether every byte of the block is NUL
pub fn is_zero_block(block: &[u8]) -> bool {
    block.iter().all(|&b| b == 0)
}

/// Unsigned and signed sums of the block with the checksum field as spaces
pub fn compute_checksum(block: &[u8; BLOCK_SIZE]) -> (u64, i64) {
    let mut unsigned = 0u64;
    let mut signed = 0i64;
    for (i, &b) in block.iter().enumerate() {
        let b = if CHKSUM.contains(&i) { b' ' } else { b };
        unsigned += u64::from(b);
        signed += i64::from(b as i8);
    }
    (unsigned, signed)
}

fn until_nul(field: &[u8]) -> &[u8] {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    &field[..end]
}

fn parse_text(field: &[u8]) -> String {
    String::from_utf8_lossy(until_nul(field)).into_owned()
}

/// Decode an octal text field, or a GNU base-256 field when the high bit of
/// the first byte is set.
fn parse_numeric(field: &[u8]) -> std::result::Result<u64, String> {
    match field.first() {
        Some(&first) if first & 0x80 != 0 => parse_base256(field),
        _ => parse_octal(field),
    }
}

fn parse_octal(field: &[u8]) -> std::result::Result<u64, String> {
    let digits = field
        .iter()
        .skip_while(|&&b| b == b' ')
        .take_while(|&&b| b != 0 && b != b' ');

    let mut value = 0u64;
    for &b in digits {
        if !(b'0'..=b'7').contains(&b) {
            return Err(format!("is not octal: {:?}", parse_text(field).trim()));
        }
        value = value
            .checked_mul(8)
            .and_then(|v| v.checked_add(u64::from(b - b'0')))
            .ok_or_else(|| "overflows 64 bits".to_string())?;
    }
    Ok(value)
}

fn parse_base256(field: &[u8]) -> std::result::Result<u64, String> {
    // 0xff marks a negative value, which no field here may hold
    if field[0] & 0x40 != 0 {
        return Err("is negative".to_string());
    }

    let width = field.len().min(8);
    let (high, low) = field.split_at(field.len() - width);
    let high_bits = high
        .iter()
        .enumerate()
        .any(|(i, &b)| if i == 0 { b & 0x7f != 0 } else { b != 0 });
    if high_bits {
        return Err("overflows 64 bits".to_string());
    }

    let value = BigEndian::read_uint(low, width);
    if high.is_empty() {
        // the marker bit sits inside the value bytes
        Ok(value & !(0x80u64 << ((width - 1) * 8)))
    } else {
        Ok(value)
    }
}
