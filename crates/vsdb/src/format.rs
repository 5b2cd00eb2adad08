// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! On-disk format vocabulary of a vector storage file.
//!
//! Every file starts with a 4 byte header: the ASCII signature `VS` followed by a little-endian
//! `u16` format version.

use std::fmt;

use vsbuf::ByteBuffer;

use crate::{Error, Result};

/// The signature at the start of every vector storage file.
pub const SIGNATURE: [u8; 2] = *b"VS";

/// The format version written by this library.
pub const VERSION: u16 = 0x0000;

/// The encoded length of a [`FileHeader`] in bytes.
pub const HEADER_LEN: usize = 4;

/// The header at offset 0 of a vector storage file.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct FileHeader {
    /// Two byte file signature.
    pub signature: [u8; 2],
    /// Format version.
    pub version: u16,
}

impl FileHeader {
    /// The header this library writes to new files and accepts when opening existing ones.
    pub const CURRENT: Self = Self {
        signature: SIGNATURE,
        version: VERSION,
    };

    /// Appends the encoded header to `buf`.
    ///
    /// # Errors
    ///
    /// Returns an error if `buf` cannot take [`HEADER_LEN`] more bytes.
    pub fn encode(&self, buf: &mut ByteBuffer) -> Result<()> {
        buf.put_slice(&self.signature)?.put_u16(self.version)?;
        Ok(())
    }

    /// Consumes an encoded header from `buf`.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than [`HEADER_LEN`] bytes remain in `buf`.
    pub fn decode(buf: &mut ByteBuffer) -> Result<Self> {
        let mut signature = [0; 2];
        buf.copy_to_slice(&mut signature)?;
        let version = buf.get_u16()?;

        Ok(Self { signature, version })
    }
}

impl Default for FileHeader {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl fmt::Display for FileHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" v{:#06x}", self.signature.escape_ascii(), self.version)
    }
}

/// The type used to represent one component of a stored vector.
///
/// Negative codes are the signed counterparts of the positive integer codes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(i8)]
#[expect(missing_docs, reason = "variant names are self-describing")]
pub enum Resolution {
    Bit = 0,
    UInt8 = 1,
    Int8 = -1,
    UInt16 = 2,
    Int16 = -2,
    UInt32 = 3,
    Int32 = -3,
    UInt64 = 4,
    Int64 = -4,
    Float16 = 10,
    Float32 = 11,
    Float64 = 12,
    Float80 = 13,
    Float128 = 14,
}

impl Resolution {
    /// The raw signed code of the resolution.
    #[must_use]
    pub const fn code(self) -> i8 {
        self as i8
    }

    /// Whether components of this resolution are signed integers.
    #[must_use]
    pub const fn is_signed_integer(self) -> bool {
        self.code() < 0
    }
}

impl TryFrom<i8> for Resolution {
    type Error = Error;

    fn try_from(code: i8) -> Result<Self> {
        Ok(match code {
            0 => Self::Bit,
            1 => Self::UInt8,
            -1 => Self::Int8,
            2 => Self::UInt16,
            -2 => Self::Int16,
            3 => Self::UInt32,
            -3 => Self::Int32,
            4 => Self::UInt64,
            -4 => Self::Int64,
            10 => Self::Float16,
            11 => Self::Float32,
            12 => Self::Float64,
            13 => Self::Float80,
            14 => Self::Float128,
            other => return Err(Error::UnknownResolution(other)),
        })
    }
}

/// How vector data is compressed. Encoded in the lowest 3 bits of a byte.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum Compression {
    /// Stored as is.
    #[default]
    None = 0x00,
    /// LZ4 compressed.
    Lz4 = 0x01,
    /// Zstandard compressed.
    Zstd = 0x02,
}

impl Compression {
    /// Mask of the bits a compression code may occupy.
    pub const MASK: u8 = 0b0000_0111;

    /// The raw code of the compression method.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Compression {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0x00 => Ok(Self::None),
            0x01 => Ok(Self::Lz4),
            0x02 => Ok(Self::Zstd),
            other => Err(Error::UnknownCompression(other)),
        }
    }
}

/// The header of a typed, length-prefixed block of data.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct BlockHeader {
    /// Block type. `0xFF` marks an unassigned block.
    pub kind: u8,
    /// Length of the block payload in bytes.
    pub length: u32,
}

impl BlockHeader {
    /// The encoded length of a block header in bytes.
    pub const LEN: usize = 5;

    /// The block type of a block that has not been assigned one.
    pub const UNASSIGNED: u8 = 0xFF;

    /// Appends the encoded block header to `buf`.
    ///
    /// # Errors
    ///
    /// Returns an error if `buf` cannot take [`Self::LEN`] more bytes.
    pub fn encode(&self, buf: &mut ByteBuffer) -> Result<()> {
        buf.put_u8(self.kind)?.put_u32(self.length)?;
        Ok(())
    }

    /// Consumes an encoded block header from `buf`.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than [`Self::LEN`] bytes remain in `buf`.
    pub fn decode(buf: &mut ByteBuffer) -> Result<Self> {
        let kind = buf.get_u8()?;
        let length = buf.get_u32()?;

        Ok(Self { kind, length })
    }
}

impl Default for BlockHeader {
    fn default() -> Self {
        Self {
            kind: Self::UNASSIGNED,
            length: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_encoding() {
        let mut buf = ByteBuffer::new(HEADER_LEN).unwrap();

        FileHeader::CURRENT.encode(&mut buf).unwrap();
        buf.flip();

        assert_eq!(buf.limit(), HEADER_LEN);
        assert_eq!(buf.as_slice(), &[0x56, 0x53, 0x00, 0x00]);
    }

    #[test]
    fn header_decoding() {
        let mut buf = ByteBuffer::new(HEADER_LEN).unwrap();
        buf.put_slice(&[b'V', b'S', 0x02, 0x01]).unwrap();
        buf.flip();

        let header = FileHeader::decode(&mut buf).unwrap();

        assert_eq!(header.signature, SIGNATURE);
        assert_eq!(header.version, 0x0102);
    }

    #[test]
    fn header_does_not_fit_small_buffer() {
        let mut buf = ByteBuffer::new(3).unwrap();

        let result = FileHeader::CURRENT.encode(&mut buf);

        assert!(matches!(result, Err(Error::Buffer(vsbuf::Error::LimitExceeded { .. }))));
    }

    #[test]
    fn truncated_header_fails_to_decode() {
        let mut buf = ByteBuffer::new(3).unwrap();
        buf.put_slice(b"VS\0").unwrap();
        buf.flip();

        let result = FileHeader::decode(&mut buf);

        assert!(matches!(result, Err(Error::Buffer(vsbuf::Error::Underflow { .. }))));
    }

    #[test]
    fn header_display_escapes_signature() {
        let header = FileHeader {
            signature: [0x00, b'S'],
            version: 0xABCD,
        };

        assert_eq!(header.to_string(), "\"\\x00S\" v0xabcd");
    }

    #[test]
    fn resolution_codes() {
        for code in i8::MIN..=i8::MAX {
            match Resolution::try_from(code) {
                Ok(resolution) => assert_eq!(resolution.code(), code),
                Err(Error::UnknownResolution(rejected)) => assert_eq!(rejected, code),
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(Resolution::try_from(-4).unwrap(), Resolution::Int64);
        assert_eq!(Resolution::try_from(14).unwrap(), Resolution::Float128);
        assert!(Resolution::Int16.is_signed_integer());
        assert!(!Resolution::Float32.is_signed_integer());
        assert!(Resolution::try_from(5).is_err());
    }

    #[test]
    fn compression_codes() {
        assert_eq!(Compression::default(), Compression::None);
        assert_eq!(Compression::try_from(0x01).unwrap(), Compression::Lz4);
        assert_eq!(Compression::Zstd.code(), 0x02);
        assert!(matches!(Compression::try_from(0x03), Err(Error::UnknownCompression(3))));

        for compression in [Compression::None, Compression::Lz4, Compression::Zstd] {
            assert_eq!(compression.code() & !Compression::MASK, 0);
        }
    }

    #[test]
    fn block_header_encoding() {
        let mut buf = ByteBuffer::extensible(0).unwrap();

        BlockHeader::default().encode(&mut buf).unwrap();
        BlockHeader { kind: 1, length: 0x0102_0304 }.encode(&mut buf).unwrap();
        buf.flip();

        assert_eq!(buf.limit(), 2 * BlockHeader::LEN);
        assert_eq!(buf.as_slice(), &[0xFF, 0, 0, 0, 0, 0x01, 0x04, 0x03, 0x02, 0x01]);

        assert_eq!(BlockHeader::decode(&mut buf).unwrap(), BlockHeader::default());
        assert_eq!(BlockHeader::decode(&mut buf).unwrap(), BlockHeader { kind: 1, length: 0x0102_0304 });
    }
}
