// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Vector storage database files.
//!
//! This crate manages the lifecycle of a vector storage file: creating it, stamping a new file
//! with the format header and checking the header of an existing file when it is opened. All
//! on-disk data is encoded through [`vsbuf::ByteBuffer`], so every multi-byte field is stored
//! little-endian regardless of the host.
//!
//! # File format
//!
//! | Offset | Length | Content |
//! |--------|--------|---------|
//! | 0      | 2      | ASCII signature `VS` |
//! | 2      | 2      | Format version, little-endian `u16`, currently `0x0000` |
//!
//! The [`format`] module also defines the resolution and compression codes and the block
//! header record of the format.
//!
//! # Opening a database
//!
//! ```
//! use vsdb::{Database, Error};
//!
//! let dir = tempfile::tempdir()?;
//! let path = dir.path().join("sample.vsdb");
//!
//! let mut db = Database::new(&path);
//! db.open()?;
//!
//! // A handle can only be open once.
//! assert!(matches!(db.open(), Err(Error::AlreadyOpened)));
//!
//! assert_eq!(std::fs::read(&path)?, b"VS\0\0");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Use [`OpenOptions`] to control file creation, locking and header verification.

mod database;
mod error;
pub mod format;
mod open_options;

pub use database::Database;
pub use error::{Error, Result};
pub use open_options::OpenOptions;
