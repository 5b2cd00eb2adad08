// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! We separate out the append methods for ease of maintenance.

use num_traits::ToBytes;

use crate::{ByteBuffer, Error, Result};

impl ByteBuffer {
    /// Appends a slice of bytes to the buffer, verbatim.
    ///
    /// # Example
    ///
    /// ```
    /// use vsbuf::ByteBuffer;
    ///
    /// let mut buf = ByteBuffer::new(13)?;
    ///
    /// buf.put_slice(b"Hello, ")?.put_slice(b"world!")?;
    /// buf.flip();
    ///
    /// assert_eq!(buf.as_slice(), b"Hello, world!");
    /// # Ok::<(), vsbuf::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::LimitExceeded`] if a fixed buffer has no room for the bytes, or
    /// [`Error::OutOfMemory`] if an extensible buffer cannot grow. Nothing is written on failure.
    pub fn put_slice(&mut self, src: &[u8]) -> Result<&mut Self> {
        self.ensure_capacity(src.len())?;
        self.write_reserved(src);
        Ok(self)
    }

    /// Appends `length` bytes of `src` starting at `offset`.
    ///
    /// # Example
    ///
    /// ```
    /// use vsbuf::ByteBuffer;
    ///
    /// let mut buf = ByteBuffer::new(2)?;
    ///
    /// buf.put_range(b"xxVSxx", 2, 2)?;
    /// buf.flip();
    ///
    /// assert_eq!(buf.as_slice(), b"VS");
    /// # Ok::<(), vsbuf::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if the range does not lie within `src`, otherwise the same
    /// errors as [`put_slice()`][Self::put_slice]. Nothing is written on failure.
    pub fn put_range(&mut self, src: &[u8], offset: usize, length: usize) -> Result<&mut Self> {
        let range = offset
            .checked_add(length)
            .and_then(|end| src.get(offset..end))
            .ok_or(Error::OutOfBounds {
                offset,
                length,
                len: src.len(),
            })?;

        self.put_slice(range)
    }

    /// Appends a number of type `T` in little-endian representation to the buffer.
    ///
    /// # Example
    ///
    /// ```
    /// use vsbuf::ByteBuffer;
    ///
    /// let mut buf = ByteBuffer::new(6)?;
    ///
    /// buf.put_num_le(0x1234_u16)?;
    /// buf.put_num_le(0xDEAD_BEEF_u32)?;
    /// buf.flip();
    ///
    /// // Little-endian: least significant byte first.
    /// assert_eq!(buf.as_slice(), &[0x34, 0x12, 0xEF, 0xBE, 0xAD, 0xDE]);
    /// # Ok::<(), vsbuf::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Same as [`put_slice()`][Self::put_slice].
    #[expect(clippy::needless_pass_by_value, reason = "tiny numeric types, fine to always pass by value")]
    pub fn put_num_le<T: ToBytes>(&mut self, value: T) -> Result<&mut Self> {
        let bytes = value.to_le_bytes();
        self.put_slice(bytes.as_ref())
    }

    /// Appends a `u8` to the buffer.
    ///
    /// # Errors
    ///
    /// Same as [`put_slice()`][Self::put_slice].
    pub fn put_u8(&mut self, value: u8) -> Result<&mut Self> {
        self.put_num_le(value)
    }

    /// Appends a `u16` to the buffer in little-endian order.
    ///
    /// # Errors
    ///
    /// Same as [`put_slice()`][Self::put_slice].
    pub fn put_u16(&mut self, value: u16) -> Result<&mut Self> {
        self.put_num_le(value)
    }

    /// Appends a `u32` to the buffer in little-endian order.
    ///
    /// # Errors
    ///
    /// Same as [`put_slice()`][Self::put_slice].
    pub fn put_u32(&mut self, value: u32) -> Result<&mut Self> {
        self.put_num_le(value)
    }

    /// Appends a `u64` to the buffer in little-endian order.
    ///
    /// # Errors
    ///
    /// Same as [`put_slice()`][Self::put_slice].
    pub fn put_u64(&mut self, value: u64) -> Result<&mut Self> {
        self.put_num_le(value)
    }

    /// Appends an `i8` to the buffer.
    ///
    /// # Errors
    ///
    /// Same as [`put_slice()`][Self::put_slice].
    pub fn put_i8(&mut self, value: i8) -> Result<&mut Self> {
        self.put_num_le(value)
    }

    /// Appends an `i16` to the buffer in little-endian two's complement.
    ///
    /// # Errors
    ///
    /// Same as [`put_slice()`][Self::put_slice].
    pub fn put_i16(&mut self, value: i16) -> Result<&mut Self> {
        self.put_num_le(value)
    }

    /// Appends an `i32` to the buffer in little-endian two's complement.
    ///
    /// # Errors
    ///
    /// Same as [`put_slice()`][Self::put_slice].
    pub fn put_i32(&mut self, value: i32) -> Result<&mut Self> {
        self.put_num_le(value)
    }

    /// Appends an `i64` to the buffer in little-endian two's complement.
    ///
    /// # Errors
    ///
    /// Same as [`put_slice()`][Self::put_slice].
    pub fn put_i64(&mut self, value: i64) -> Result<&mut Self> {
        self.put_num_le(value)
    }
}
