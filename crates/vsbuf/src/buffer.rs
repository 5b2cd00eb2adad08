// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;
use std::io::{self, Read, Write};

use tracing::{Level, event};

use crate::{Error, Result};

/// Upper bound on the extra capacity added on top of the requested bytes when an
/// extensible buffer grows.
pub const MAX_GROWTH_INCREMENT: usize = 8192;

/// An owned byte region with a cursor (`position`), a boundary of valid data (`limit`)
/// and an allocated size (`capacity`).
///
/// The buffer always satisfies `0 <= position <= limit <= capacity`, and its capacity never
/// shrinks.
///
/// # Fill and drain
///
/// A buffer starts in "fill mode": append operations (`put_*`) write at the position and move
/// it forward. Calling [`flip()`][Self::flip] switches to "drain mode": the limit becomes the
/// old position and the position returns to 0, so the bytes just written can be read back
/// (`get_*`) or transferred to a writer via [`write_to()`][Self::write_to].
///
/// # Growth
///
/// Whether the buffer may grow is fixed at construction. A fixed buffer rejects any append that
/// would run past its limit with [`Error::LimitExceeded`]. An extensible buffer instead raises
/// its limit to cover the append, reallocating when the append runs past the capacity. A
/// reallocation grows the capacity by the requested bytes plus `min(capacity * 2, 8192)`.
///
/// # Byte order
///
/// Multi-byte integers are always stored in little-endian order, independent of the byte
/// order of the host.
///
/// # Example
///
/// ```
/// use vsbuf::ByteBuffer;
///
/// let mut buf = ByteBuffer::new(4)?;
/// buf.put_u8(b'V')?.put_u8(b'S')?.put_u16(0x0000)?;
/// buf.flip();
///
/// assert_eq!(buf.limit(), 4);
/// assert_eq!(buf.as_slice(), &[0x56, 0x53, 0x00, 0x00]);
/// # Ok::<(), vsbuf::Error>(())
/// ```
///
/// # Thread safety
///
/// The buffer carries no internal synchronization. It is `Send` and `Sync` like any owned
/// byte container; callers that share one across threads must serialize access themselves.
pub struct ByteBuffer {
    // The length of the vector is the capacity of the buffer. Every byte up to the
    // capacity is initialized so that reads into the storage never see uninitialized memory.
    data: Vec<u8>,
    position: usize,
    limit: usize,
    extensible: bool,
}

impl ByteBuffer {
    /// Creates a fixed buffer of exactly `size` bytes.
    ///
    /// The position starts at 0 and the limit and capacity at `size`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] if the storage cannot be allocated.
    pub fn new(size: usize) -> Result<Self> {
        Self::with_mode(size, false)
    }

    /// Creates an extensible buffer with an initial capacity of `size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] if the storage cannot be allocated.
    pub fn extensible(size: usize) -> Result<Self> {
        Self::with_mode(size, true)
    }

    /// Creates a buffer of `size` bytes whose growth mode is given by `extensible`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] if the storage cannot be allocated.
    pub fn with_mode(size: usize, extensible: bool) -> Result<Self> {
        let mut data = Vec::new();
        data.try_reserve_exact(size).map_err(|source| Error::OutOfMemory {
            requested: size,
            source: Some(source),
        })?;
        data.resize(size, 0);

        Ok(Self {
            data,
            position: 0,
            limit: size,
            extensible,
        })
    }

    /// The offset of the next byte to read or write.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// The boundary of currently valid (or, in fill mode, reserved) data.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// The number of bytes currently allocated for the buffer storage.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// The number of bytes between the position and the limit.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.limit - self.position
    }

    /// Whether any bytes lie between the position and the limit.
    #[must_use]
    pub const fn has_remaining(&self) -> bool {
        self.position < self.limit
    }

    /// Whether the buffer grows on demand instead of rejecting appends past its limit.
    #[must_use]
    pub const fn is_extensible(&self) -> bool {
        self.extensible
    }

    /// The bytes of the buffer from index 0 up to (not including) the limit.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.limit]
    }

    /// Switches from fill mode to drain mode.
    ///
    /// The limit is set to the current position and the position is reset to 0, so the buffer
    /// now offers exactly the bytes written before the flip.
    pub fn flip(&mut self) -> &mut Self {
        self.limit = self.position;
        self.position = 0;
        self
    }

    /// Resets the buffer for a new fill cycle.
    ///
    /// The position is reset to 0 and the limit is restored to the full capacity. The bytes
    /// are not erased.
    pub fn clear(&mut self) -> &mut Self {
        self.position = 0;
        self.limit = self.capacity();
        self
    }

    /// Resets the position to 0 while keeping the limit, so drained data can be read again.
    pub fn rewind(&mut self) -> &mut Self {
        self.position = 0;
        self
    }

    /// Makes sure `additional` bytes can be written at the position.
    ///
    /// This is a no-op if the bytes fit below the limit. Otherwise a fixed buffer fails and an
    /// extensible buffer raises its limit to `position + additional`, growing its storage first
    /// if the new limit lies past the capacity.
    pub(crate) fn ensure_capacity(&mut self, additional: usize) -> Result<()> {
        let end = self.position.checked_add(additional).ok_or(Error::OutOfMemory {
            requested: usize::MAX,
            source: None,
        })?;

        if end <= self.limit {
            return Ok(());
        }

        if !self.extensible {
            return Err(Error::LimitExceeded {
                requested: additional,
                available: self.remaining(),
            });
        }

        if end > self.capacity() {
            self.grow(additional)?;
        }

        self.limit = end;
        Ok(())
    }

    fn grow(&mut self, additional: usize) -> Result<()> {
        let capacity = self.capacity();
        let increment = capacity.saturating_mul(2).min(MAX_GROWTH_INCREMENT);
        let new_capacity = capacity
            .checked_add(additional)
            .and_then(|c| c.checked_add(increment))
            .ok_or(Error::OutOfMemory {
                requested: usize::MAX,
                source: None,
            })?;

        // The storage is only touched once the reservation succeeded, so a failed growth
        // leaves every previously written byte in place.
        self.data
            .try_reserve_exact(new_capacity - capacity)
            .map_err(|source| Error::OutOfMemory {
                requested: new_capacity,
                source: Some(source),
            })?;
        self.data.resize(new_capacity, 0);

        event!(Level::TRACE, old_capacity = capacity, new_capacity, "byte buffer grown");

        Ok(())
    }

    /// Copies `src` into the storage at the position and moves the position past it.
    ///
    /// The caller must have reserved the bytes via `ensure_capacity()`.
    pub(crate) fn write_reserved(&mut self, src: &[u8]) {
        let end = self.position + src.len();
        debug_assert!(end <= self.limit);

        self.data[self.position..end].copy_from_slice(src);
        self.position = end;
    }

    /// Returns the next `count` bytes after the position without consuming them.
    pub(crate) fn peek(&self, count: usize) -> Result<&[u8]> {
        let available = self.remaining();
        if count > available {
            return Err(Error::Underflow {
                requested: count,
                available,
            });
        }

        Ok(&self.data[self.position..self.position + count])
    }

    /// Moves the position forward by `count` bytes that were already validated via `peek()`.
    pub(crate) fn skip_validated(&mut self, count: usize) {
        debug_assert!(count <= self.remaining());
        self.position += count;
    }

    /// Performs a single read from `reader` into the bytes between the position and the limit.
    ///
    /// The position advances by the number of bytes actually read, which is also returned. A
    /// short read is not an error; the caller inspects the returned count and loops if it needs
    /// the whole region filled. If no bytes remain, `Ok(0)` is returned without touching the
    /// reader.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the reader fails (including
    /// [`Interrupted`](std::io::ErrorKind::Interrupted), which is not retried) or reports more
    /// bytes than it was given room for. The position does not move on failure.
    pub fn read_from<R: Read + ?Sized>(&mut self, reader: &mut R) -> Result<usize> {
        let remaining = self.remaining();
        if remaining == 0 {
            return Ok(0);
        }

        let count = reader.read(&mut self.data[self.position..self.limit])?;
        if count > remaining {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("reader reported {count} bytes read into a {remaining} byte region"),
            )));
        }

        self.position += count;
        Ok(count)
    }

    /// Performs a single write of the bytes between the position and the limit to `writer`.
    ///
    /// The position advances by the number of bytes actually written, which is also returned.
    /// A short write is not an error; the caller inspects the returned count and loops if it
    /// needs everything written. If no bytes remain, `Ok(0)` is returned without touching the
    /// writer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the writer fails or reports more bytes than it was given. The
    /// position does not move on failure.
    pub fn write_to<W: Write + ?Sized>(&mut self, writer: &mut W) -> Result<usize> {
        let remaining = self.remaining();
        if remaining == 0 {
            return Ok(0);
        }

        let count = writer.write(&self.data[self.position..self.limit])?;
        if count > remaining {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("writer reported {count} bytes written from a {remaining} byte region"),
            )));
        }

        self.position += count;
        Ok(count)
    }
}

impl AsRef<[u8]> for ByteBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteBuffer")
            .field("position", &self.position)
            .field("limit", &self.limit)
            .field("capacity", &self.capacity())
            .field("extensible", &self.extensible)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use static_assertions::assert_impl_all;

    use super::*;

    #[test]
    fn thread_safe_type() {
        assert_impl_all!(ByteBuffer: Send, Sync);
    }

    #[test]
    fn new_sets_limit_and_capacity_to_size() {
        let buf = ByteBuffer::new(16).unwrap();

        assert_eq!(buf.position(), 0);
        assert_eq!(buf.limit(), 16);
        assert_eq!(buf.capacity(), 16);
        assert_eq!(buf.remaining(), 16);
        assert!(!buf.is_extensible());
    }

    #[test]
    fn new_zero_sized() {
        let buf = ByteBuffer::new(0).unwrap();

        assert_eq!(buf.capacity(), 0);
        assert!(!buf.has_remaining());
        assert!(buf.as_slice().is_empty());
    }

    #[test]
    fn huge_allocation_fails_with_out_of_memory() {
        let result = ByteBuffer::new(usize::MAX);

        assert!(matches!(result, Err(Error::OutOfMemory { .. })));
    }

    #[test]
    fn flip_sets_limit_to_position() {
        let mut buf = ByteBuffer::new(8).unwrap();
        buf.put_u16(0xBEEF).unwrap();

        buf.flip();

        assert_eq!(buf.position(), 0);
        assert_eq!(buf.limit(), 2);
        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf.as_slice(), &[0xEF, 0xBE]);
    }

    #[test]
    fn clear_restores_full_limit() {
        let mut buf = ByteBuffer::new(8).unwrap();
        buf.put_u32(7).unwrap();
        buf.flip();

        buf.clear();

        assert_eq!(buf.position(), 0);
        assert_eq!(buf.limit(), 8);
    }

    #[test]
    fn rewind_keeps_limit() {
        let mut buf = ByteBuffer::new(8).unwrap();
        buf.put_u32(7).unwrap();
        buf.flip();
        assert_eq!(buf.get_u32().unwrap(), 7);

        buf.rewind();

        assert_eq!(buf.position(), 0);
        assert_eq!(buf.limit(), 4);
        assert_eq!(buf.get_u32().unwrap(), 7);
    }

    #[test]
    fn fixed_buffer_rejects_append_past_limit() {
        let mut buf = ByteBuffer::new(2).unwrap();

        let result = buf.put_u32(0xDEAD_BEEF);

        assert!(matches!(
            result,
            Err(Error::LimitExceeded {
                requested: 4,
                available: 2
            })
        ));
        assert_eq!(buf.position(), 0);
        assert_eq!(buf.limit(), 2);
        assert_eq!(buf.capacity(), 2);
    }

    #[test]
    fn extensible_buffer_grows_past_capacity() {
        let mut buf = ByteBuffer::extensible(4).unwrap();

        buf.put_u64(0x0102_0304_0506_0708).unwrap();

        // 4 + 8 + min(4 * 2, 8192)
        assert_eq!(buf.capacity(), 20);
        assert!(buf.capacity() >= 12);
        assert_eq!(buf.position(), 8);
        assert_eq!(buf.limit(), 8);
    }

    #[test]
    fn growth_increment_is_capped() {
        let mut buf = ByteBuffer::extensible(10_000).unwrap();
        buf.put_slice(&[0xAA; 10_000]).unwrap();

        buf.put_u8(1).unwrap();

        assert_eq!(buf.capacity(), 10_000 + 1 + MAX_GROWTH_INCREMENT);
    }

    #[test]
    fn extensible_append_below_limit_does_not_move_limit() {
        let mut buf = ByteBuffer::extensible(8).unwrap();

        buf.put_u8(1).unwrap();

        assert_eq!(buf.limit(), 8);
        assert_eq!(buf.capacity(), 8);
    }

    #[test]
    fn extensible_append_after_flip_raises_limit_without_growth() {
        let mut buf = ByteBuffer::extensible(8).unwrap();
        buf.put_u8(1).unwrap();
        buf.flip();
        buf.put_u8(2).unwrap();

        buf.put_u16(3).unwrap();

        assert_eq!(buf.limit(), 3);
        assert_eq!(buf.capacity(), 8);
    }

    #[test]
    fn growth_preserves_written_bytes() {
        let mut buf = ByteBuffer::extensible(1).unwrap();

        for i in 0..=255_u8 {
            buf.put_u8(i).unwrap();
        }

        assert!(buf.capacity() >= buf.position());
        assert_eq!(buf.limit(), buf.position());
        let expected: Vec<u8> = (0..=255).collect();
        assert_eq!(buf.as_slice(), expected.as_slice());
    }

    #[test]
    fn capacity_never_shrinks() {
        let mut buf = ByteBuffer::extensible(2).unwrap();
        buf.put_u64(1).unwrap();
        let grown = buf.capacity();

        buf.flip();
        buf.clear();
        buf.flip();

        assert_eq!(buf.capacity(), grown);
    }

    #[test]
    fn read_from_with_nothing_remaining_returns_zero() {
        let mut buf = ByteBuffer::new(0).unwrap();
        let mut reader = Cursor::new(vec![1_u8, 2, 3]);

        assert_eq!(buf.read_from(&mut reader).unwrap(), 0);
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn read_from_advances_by_bytes_read() {
        let mut buf = ByteBuffer::new(4).unwrap();
        let mut reader = Cursor::new(vec![1_u8, 2, 3, 4, 5]);

        assert_eq!(buf.read_from(&mut reader).unwrap(), 4);
        assert_eq!(buf.position(), 4);
        assert_eq!(buf.as_slice(), &[1, 2, 3, 4]);
    }

    #[test]
    fn read_from_short_read_is_not_an_error() {
        let mut buf = ByteBuffer::new(8).unwrap();
        let mut reader = Cursor::new(vec![9_u8, 8]);

        assert_eq!(buf.read_from(&mut reader).unwrap(), 2);
        assert_eq!(buf.position(), 2);
        assert_eq!(buf.remaining(), 6);

        // End of input.
        assert_eq!(buf.read_from(&mut reader).unwrap(), 0);
        assert_eq!(buf.position(), 2);
    }

    #[test]
    fn write_to_with_nothing_remaining_returns_zero() {
        let mut buf = ByteBuffer::new(4).unwrap();
        buf.flip();
        let mut out = Vec::new();

        assert_eq!(buf.write_to(&mut out).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn write_to_transfers_flipped_bytes() {
        let mut buf = ByteBuffer::new(8).unwrap();
        buf.put_u32(0x0403_0201).unwrap();
        buf.flip();
        let mut out = Vec::new();

        assert_eq!(buf.write_to(&mut out).unwrap(), 4);
        assert_eq!(out, [1, 2, 3, 4]);
        assert_eq!(buf.position(), 4);
        assert!(!buf.has_remaining());
    }

    struct FailingIo;

    impl Read for FailingIo {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "read failed"))
        }
    }

    impl Write for FailingIo {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "write failed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn read_failure_is_reported_and_position_kept() {
        let mut buf = ByteBuffer::new(4).unwrap();

        let result = buf.read_from(&mut FailingIo);

        match result {
            Err(Error::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(buf.position(), 0);
    }

    #[test]
    fn write_failure_is_reported_and_position_kept() {
        let mut buf = ByteBuffer::new(4).unwrap();
        buf.put_u16(1).unwrap();
        buf.flip();

        let result = buf.write_to(&mut FailingIo);

        match result {
            Err(Error::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(buf.position(), 0);
    }

    struct LyingWriter;

    impl Write for LyingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len() + 1)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_overreport_is_rejected() {
        let mut buf = ByteBuffer::new(2).unwrap();
        buf.put_u16(1).unwrap();
        buf.flip();

        let result = buf.write_to(&mut LyingWriter);

        assert!(matches!(result, Err(Error::Io(_))));
        assert_eq!(buf.position(), 0);
    }

    #[test]
    fn debug_shows_cursor_state() {
        let buf = ByteBuffer::extensible(3).unwrap();

        let text = format!("{buf:?}");

        assert!(text.contains("position: 0"));
        assert!(text.contains("capacity: 3"));
        assert!(text.contains("extensible: true"));
    }
}
