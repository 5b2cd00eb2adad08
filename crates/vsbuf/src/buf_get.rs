// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! We separate out all the consumption methods for ease of maintenance.

use num_traits::FromBytes;

use crate::{ByteBuffer, Error, Result};

impl ByteBuffer {
    /// Consumes a number of type `T` in little-endian representation.
    ///
    /// The bytes are taken from the position, which moves past them.
    ///
    /// # Example
    ///
    /// ```
    /// use vsbuf::ByteBuffer;
    ///
    /// let mut buf = ByteBuffer::new(8)?;
    /// buf.put_u64(0x0102_0304_0506_0708)?;
    /// buf.flip();
    ///
    /// assert_eq!(buf.get_num_le::<u64>()?, 0x0102_0304_0506_0708);
    /// assert!(!buf.has_remaining());
    /// # Ok::<(), vsbuf::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] if fewer than `size_of::<T>()` bytes lie between the
    /// position and the limit. The position does not move on failure.
    pub fn get_num_le<T>(&mut self) -> Result<T>
    where
        T: FromBytes,
        T::Bytes: Sized + for<'a> TryFrom<&'a [u8]>,
    {
        let size = size_of::<T>();
        let src = self.peek(size)?;

        let Ok(bytes) = <T::Bytes>::try_from(src) else {
            return Err(Error::Underflow {
                requested: size,
                available: src.len(),
            });
        };

        self.skip_validated(size);
        Ok(T::from_le_bytes(&bytes))
    }

    /// Transfers bytes from the position into `dst`, filling it completely.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] if fewer than `dst.len()` bytes remain. Neither `dst` nor
    /// the position is changed on failure.
    pub fn copy_to_slice(&mut self, dst: &mut [u8]) -> Result<()> {
        let src = self.peek(dst.len())?;
        dst.copy_from_slice(src);
        self.skip_validated(dst.len());
        Ok(())
    }

    /// Consumes a `u8`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] if no bytes remain.
    pub fn get_u8(&mut self) -> Result<u8> {
        self.get_num_le()
    }

    /// Consumes a little-endian `u16`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] if fewer than 2 bytes remain.
    pub fn get_u16(&mut self) -> Result<u16> {
        self.get_num_le()
    }

    /// Consumes a little-endian `u32`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] if fewer than 4 bytes remain.
    pub fn get_u32(&mut self) -> Result<u32> {
        self.get_num_le()
    }

    /// Consumes a little-endian `u64`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] if fewer than 8 bytes remain.
    pub fn get_u64(&mut self) -> Result<u64> {
        self.get_num_le()
    }

    /// Consumes an `i8`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] if no bytes remain.
    pub fn get_i8(&mut self) -> Result<i8> {
        self.get_num_le()
    }

    /// Consumes a little-endian `i16`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] if fewer than 2 bytes remain.
    pub fn get_i16(&mut self) -> Result<i16> {
        self.get_num_le()
    }

    /// Consumes a little-endian `i32`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] if fewer than 4 bytes remain.
    pub fn get_i32(&mut self) -> Result<i32> {
        self.get_num_le()
    }

    /// Consumes a little-endian `i64`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] if fewer than 8 bytes remain.
    pub fn get_i64(&mut self) -> Result<i64> {
        self.get_num_le()
    }
}
