// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::path::PathBuf;

use thiserror::Error;

use crate::format::FileHeader;

/// Any error that may arise from opening, checking or inspecting a vector storage file.
///
/// # Thread safety
///
/// This type is thread-safe.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The database handle is already open. A handle must be closed before it can be reopened.
    #[error("database already opened")]
    AlreadyOpened,

    /// The operation needs an open database handle but the handle is closed.
    #[error("database is not open")]
    Closed,

    /// Another handle holds the exclusive lock on the file.
    #[error("database file is locked by another handle: {}", .path.display())]
    Locked {
        /// The file that could not be locked.
        path: PathBuf,
    },

    /// The file is too short to carry a vector storage header.
    #[error("specified file is not vector storage: {} ({len} bytes)", .path.display())]
    NotVectorStorage {
        /// The file that was rejected.
        path: PathBuf,
        /// The size of the file in bytes.
        len: u64,
    },

    /// The file header does not carry the expected signature or version.
    #[error("file header mismatch: expected {expected}, found {found}")]
    HeaderMismatch {
        /// The header this library writes.
        expected: FileHeader,
        /// The header read from the file.
        found: FileHeader,
    },

    /// A raw code does not name a known vector resolution.
    #[error("unknown resolution code {0}")]
    UnknownResolution(i8),

    /// A raw code does not name a known compression method.
    #[error("unknown compression code {0}")]
    UnknownCompression(u8),

    /// We are forwarding an error received from the byte buffer that encodes file contents.
    #[error(transparent)]
    Buffer(#[from] vsbuf::Error),

    /// We are forwarding an error received from the standard library's I/O APIs.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A `Result` that may contain an [`Error`] from this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a database error as a standard I/O error.
/// This is often used when interoperating with code that expects standard I/O errors.
impl From<Error> for std::io::Error {
    fn from(value: Error) -> Self {
        match value {
            Error::Io(error) => error,
            Error::Buffer(error) => error.into(),
            Error::Locked { .. } => Self::new(std::io::ErrorKind::WouldBlock, value),
            Error::NotVectorStorage { .. } | Error::HeaderMismatch { .. } => Self::new(std::io::ErrorKind::InvalidData, value),
            _ => Self::other(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use static_assertions::assert_impl_all;

    use super::*;

    #[test]
    fn thread_safe_type() {
        assert_impl_all!(Error: Send, Sync);
    }

    #[test]
    fn display_messages() {
        assert_eq!(Error::AlreadyOpened.to_string(), "database already opened");
        assert_eq!(
            Error::NotVectorStorage {
                path: PathBuf::from("tiny.vsdb"),
                len: 3
            }
            .to_string(),
            "specified file is not vector storage: tiny.vsdb (3 bytes)"
        );
        assert_eq!(
            Error::HeaderMismatch {
                expected: FileHeader::CURRENT,
                found: FileHeader {
                    signature: *b"XX",
                    version: 7
                }
            }
            .to_string(),
            "file header mismatch: expected \"VS\" v0x0000, found \"XX\" v0x0007"
        );
    }

    #[test]
    fn buffer_error_is_forwarded() {
        let e: Error = vsbuf::Error::Underflow {
            requested: 4,
            available: 1,
        }
        .into();

        let io_error: std::io::Error = e.into();
        assert_eq!(io_error.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn into_stdio_error() {
        let io_error: std::io::Error = Error::AlreadyOpened.into();
        assert_eq!(io_error.kind(), ErrorKind::Other);
        assert_eq!(io_error.to_string(), "database already opened");

        let io_error: std::io::Error = Error::Io(std::io::Error::new(ErrorKind::NotFound, "gone")).into();
        assert_eq!(io_error.kind(), ErrorKind::NotFound);
    }
}
