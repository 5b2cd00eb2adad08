// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fs::{File, TryLockError};
use std::io::{self, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::{Level, event};
use vsbuf::ByteBuffer;

use crate::format::{FileHeader, HEADER_LEN};
use crate::{Error, OpenOptions, Result};

/// A handle to a vector storage file.
///
/// A handle is created closed and bound to a path. [`open()`][Self::open] opens (or creates)
/// the file: an empty file receives a fresh header, a non-empty file must already carry one.
/// Only one open file per handle is permitted, and with locking enabled (the default) only one
/// handle per file.
///
/// The file is closed when the handle is dropped.
///
/// # Example
///
/// ```
/// use vsdb::Database;
/// use vsdb::format::{FileHeader, HEADER_LEN};
///
/// let dir = tempfile::tempdir()?;
/// let mut db = Database::new(dir.path().join("sample.vsdb"));
///
/// db.open()?;
/// assert_eq!(db.size()?, HEADER_LEN as u64);
/// assert_eq!(db.header()?, FileHeader::CURRENT);
///
/// db.close();
/// assert!(!db.is_open());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Database {
    path: PathBuf,
    options: OpenOptions,
    file: Option<File>,
}

impl Database {
    /// Creates a closed handle for the file at `path` with default [`OpenOptions`].
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_options(path, OpenOptions::new())
    }

    /// Creates a closed handle for the file at `path` that opens with `options`.
    #[must_use]
    pub fn with_options(path: impl Into<PathBuf>, options: OpenOptions) -> Self {
        Self {
            path: path.into(),
            options,
            file: None,
        }
    }

    /// The path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the handle currently has the file open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Opens the backing file for reading and appending.
    ///
    /// If the file is empty, the 4 byte header is written at offset 0. Otherwise the file must
    /// be at least as long as a header and, unless disabled via [`OpenOptions::verify`], carry
    /// the header this library writes. On failure the handle stays closed.
    ///
    /// # Errors
    ///
    /// * [`Error::AlreadyOpened`] if the handle is already open.
    /// * [`Error::Locked`] if another handle holds the lock on the file.
    /// * [`Error::NotVectorStorage`] if the file is non-empty but shorter than a header.
    /// * [`Error::HeaderMismatch`] if the file header has the wrong signature or version.
    /// * [`Error::Io`] if the file cannot be opened, read or written.
    pub fn open(&mut self) -> Result<()> {
        if self.file.is_some() {
            return Err(Error::AlreadyOpened);
        }

        let mut file = File::options()
            .read(true)
            .append(true)
            .create(self.options.create)
            .open(&self.path)?;

        if self.options.lock {
            match file.try_lock() {
                Ok(()) => {}
                Err(TryLockError::WouldBlock) => {
                    return Err(Error::Locked { path: self.path.clone() });
                }
                Err(TryLockError::Error(e)) => return Err(e.into()),
            }
        }

        match file.metadata()?.len() {
            0 => init(&mut file)?,
            len if len < HEADER_LEN as u64 => {
                return Err(Error::NotVectorStorage {
                    path: self.path.clone(),
                    len,
                });
            }
            _ if self.options.verify => verify(&mut file)?,
            _ => {}
        }

        event!(Level::DEBUG, path = %self.path.display(), "database opened");

        self.file = Some(file);
        Ok(())
    }

    /// Closes the backing file, releasing its lock. Closing a closed handle does nothing.
    pub fn close(&mut self) {
        if self.file.take().is_some() {
            event!(Level::DEBUG, path = %self.path.display(), "database closed");
        }
    }

    /// The current size of the backing file in bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the handle is not open, or [`Error::Io`] if the file
    /// metadata cannot be read.
    pub fn size(&self) -> Result<u64> {
        Ok(self.file()?.metadata()?.len())
    }

    /// Reads and decodes the header at the start of the backing file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the handle is not open, [`Error::NotVectorStorage`] if the
    /// file ends before a whole header, or [`Error::Io`] if the file cannot be read.
    pub fn header(&self) -> Result<FileHeader> {
        let mut file = self.file()?;
        read_header(&mut file)?.ok_or_else(|| Error::NotVectorStorage {
            path: self.path.clone(),
            len: file.metadata().map(|m| m.len()).unwrap_or_default(),
        })
    }

    fn file(&self) -> Result<&File> {
        self.file.as_ref().ok_or(Error::Closed)
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        self.close();
    }
}

/// Writes the current header at the start of an empty file.
fn init(file: &mut File) -> Result<()> {
    let mut buf = ByteBuffer::new(HEADER_LEN)?;
    FileHeader::CURRENT.encode(&mut buf)?;
    buf.flip();

    file.seek(SeekFrom::Start(0))?;
    while buf.has_remaining() {
        if buf.write_to(file)? == 0 {
            return Err(io::Error::from(io::ErrorKind::WriteZero).into());
        }
    }

    event!(Level::DEBUG, header = %FileHeader::CURRENT, "database file initialized");
    Ok(())
}

/// Checks that the file starts with the current header.
fn verify(file: &mut File) -> Result<()> {
    let Some(found) = read_header(file)? else {
        // The caller checked the length, so the file shrank underneath us.
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    };

    if found != FileHeader::CURRENT {
        event!(Level::WARN, expected = %FileHeader::CURRENT, %found, "database file header mismatch");
        return Err(Error::HeaderMismatch {
            expected: FileHeader::CURRENT,
            found,
        });
    }

    event!(Level::DEBUG, header = %found, "database file header verified");
    Ok(())
}

/// Reads the header at offset 0, returning `None` if the file ends first.
fn read_header<R: io::Read + Seek>(reader: &mut R) -> Result<Option<FileHeader>> {
    let mut buf = ByteBuffer::new(HEADER_LEN)?;

    reader.seek(SeekFrom::Start(0))?;
    while buf.has_remaining() {
        match buf.read_from(reader) {
            Ok(0) => return Ok(None),
            Ok(_) => {}
            Err(vsbuf::Error::Io(e)) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }

    buf.flip();
    Ok(Some(FileHeader::decode(&mut buf)?))
}
