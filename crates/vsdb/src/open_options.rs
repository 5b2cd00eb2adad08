// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::path::Path;

use crate::{Database, Result};

/// Options which can be used to configure how a [`Database`] is opened.
///
/// Generally speaking, when using `OpenOptions`, you'll first call [`OpenOptions::new`],
/// then chain calls to methods to set each option, then call [`OpenOptions::open`].
///
/// ```
/// use vsdb::OpenOptions;
///
/// let dir = tempfile::tempdir()?;
/// let db = OpenOptions::new().lock(false).open(dir.path().join("sample.vsdb"))?;
///
/// assert!(db.is_open());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OpenOptions {
    pub(crate) create: bool,
    pub(crate) lock: bool,
    pub(crate) verify: bool,
}

impl OpenOptions {
    /// Creates the default set of options: create the file if missing, lock it exclusively
    /// and verify the header of existing files.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            create: true,
            lock: true,
            verify: true,
        }
    }

    /// Sets the option to create the file if it does not exist.
    ///
    /// When false, opening a missing file fails with a
    /// [`NotFound`](std::io::ErrorKind::NotFound) I/O error.
    pub const fn create(&mut self, create: bool) -> &mut Self {
        self.create = create;
        self
    }

    /// Sets the option to take an exclusive advisory lock on the file while it is open.
    ///
    /// With locking enabled, a second handle to the same file, in this process or another,
    /// fails to open with [`Error::Locked`][crate::Error::Locked].
    pub const fn lock(&mut self, lock: bool) -> &mut Self {
        self.lock = lock;
        self
    }

    /// Sets the option to check the header of a non-empty file when it is opened.
    ///
    /// Files shorter than a header are rejected even when this is false.
    pub const fn verify(&mut self, verify: bool) -> &mut Self {
        self.verify = verify;
        self
    }

    /// Opens the database at `path` with the options specified by `self`.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Database::open`].
    pub fn open(&self, path: impl AsRef<Path>) -> Result<Database> {
        let mut database = Database::with_options(path.as_ref(), *self);
        database.open()?;
        Ok(database)
    }
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self::new()
    }
}
