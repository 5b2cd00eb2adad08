// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A byte buffer with position, limit and capacity, for encoding fixed-width integers in a
//! platform-independent byte order and moving the encoded bytes to and from files.
//!
//! # Model
//!
//! A [`ByteBuffer`] owns a single contiguous region of bytes and tracks three offsets:
//!
//! * **position** - where the next byte is read or written.
//! * **limit** - the end of valid (or reserved) data. Reads and transfers never go past it.
//! * **capacity** - how many bytes are allocated. It only ever grows.
//!
//! These always satisfy `0 <= position <= limit <= capacity`.
//!
//! # Producing bytes
//!
//! Appends (`put_*`) write at the position and move it forward. Multi-byte integers are
//! written least significant byte first, regardless of the host byte order, so the bytes can
//! go straight to disk or onto the wire.
//!
//! ```
//! use vsbuf::ByteBuffer;
//!
//! let mut buf = ByteBuffer::new(6)?;
//! buf.put_slice(b"VS")?.put_u32(0x0A0B_0C0D)?;
//! buf.flip();
//!
//! assert_eq!(buf.as_slice(), &[b'V', b'S', 0x0D, 0x0C, 0x0B, 0x0A]);
//! # Ok::<(), vsbuf::Error>(())
//! ```
//!
//! A buffer created with [`ByteBuffer::new()`] is fixed: an append that does not fit before
//! the limit fails with [`Error::LimitExceeded`] and writes nothing. A buffer created with
//! [`ByteBuffer::extensible()`] grows instead.
//!
//! # Consuming bytes
//!
//! After [`flip()`][ByteBuffer::flip], the buffer offers the bytes written so far. They can be
//! read back with the `get_*` family or handed to any [`std::io::Write`] via
//! [`write_to()`][ByteBuffer::write_to]. Going the other way,
//! [`read_from()`][ByteBuffer::read_from] fills the buffer from any [`std::io::Read`].
//!
//! Each transfer is a single attempt that may move fewer bytes than remain. Callers that
//! need the whole region transferred loop until [`remaining()`][ByteBuffer::remaining] is 0:
//!
//! ```
//! use vsbuf::ByteBuffer;
//!
//! let mut buf = ByteBuffer::new(4)?;
//! buf.put_u32(42)?;
//! buf.flip();
//!
//! let mut sink = Vec::new();
//! while buf.has_remaining() {
//!     buf.write_to(&mut sink)?;
//! }
//!
//! assert_eq!(sink, 42_u32.to_le_bytes());
//! # Ok::<(), vsbuf::Error>(())
//! ```

mod buf_get;
mod buf_put;
mod buffer;
mod error;

pub use buffer::{ByteBuffer, MAX_GROWTH_INCREMENT};
pub use error::{Error, Result};
