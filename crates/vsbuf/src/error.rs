// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::TryReserveError;

use thiserror::Error;

/// An error signaled by a [`ByteBuffer`][crate::ByteBuffer] operation.
///
/// Every fallible buffer operation reports its failure through this type. A failed operation
/// leaves the buffer exactly as it was before the call: no bytes are written and the position
/// does not move.
///
/// # Thread safety
///
/// This type is thread-safe.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An append would run past the limit of a fixed (non-extensible) buffer.
    ///
    /// The caller must either size the buffer correctly up front or use an extensible buffer.
    #[error("buffer limit exceeded: {requested} bytes requested, {available} bytes available")]
    LimitExceeded {
        /// Number of bytes the operation tried to append.
        requested: usize,
        /// Number of bytes between the position and the limit.
        available: usize,
    },

    /// Memory for the buffer storage could not be obtained.
    #[error("out of memory: cannot allocate {requested} bytes of buffer storage")]
    OutOfMemory {
        /// Total storage size that was requested.
        requested: usize,
        /// The allocator failure, if the request reached the allocator.
        #[source]
        source: Option<TryReserveError>,
    },

    /// A read would consume more bytes than lie between the position and the limit.
    #[error("buffer underflow: {requested} bytes requested, {available} bytes available")]
    Underflow {
        /// Number of bytes the operation tried to consume.
        requested: usize,
        /// Number of bytes between the position and the limit.
        available: usize,
    },

    /// A source range does not fit inside the slice it was taken from.
    #[error("range {offset}..{offset}+{length} is out of bounds for a slice of {len} bytes")]
    OutOfBounds {
        /// Start of the requested range.
        offset: usize,
        /// Length of the requested range.
        length: usize,
        /// Length of the slice the range was applied to.
        len: usize,
    },

    /// We are forwarding an error received from the standard library's I/O APIs.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A `Result` that may contain an [`Error`] from this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a buffer error as a standard I/O error.
/// This is often used when interoperating with code that expects standard I/O errors.
impl From<Error> for std::io::Error {
    fn from(value: Error) -> Self {
        match value {
            Error::Io(error) => error,
            Error::OutOfMemory { .. } => Self::new(std::io::ErrorKind::OutOfMemory, value),
            Error::Underflow { .. } => Self::new(std::io::ErrorKind::UnexpectedEof, value),
            Error::LimitExceeded { .. } | Error::OutOfBounds { .. } => Self::new(std::io::ErrorKind::InvalidInput, value),
        }
    }
}
