// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Opens a vector storage file, creating and initializing it if needed.
//!
//! # Usage
//!
//! ```bash
//! vsdb sample.vsdb
//! ```
//!
//! The tool prints the file header and size and exits with code 0 if the file is a valid
//! vector storage file, or prints a diagnostic and exits with code 1 otherwise.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;
use vsdb::OpenOptions;

#[derive(Parser, Debug)]
#[command(name = "vsdb", version, about = "Opens or creates a vector storage file")]
struct Cli {
    /// Path to the database file
    #[arg(value_name = "PATH", default_value = "sample.vsdb")]
    path: PathBuf,

    /// Fail instead of creating the file if it does not exist
    #[arg(long)]
    no_create: bool,

    /// Do not take an exclusive lock on the file
    #[arg(long)]
    no_lock: bool,

    /// Do not check the header of an existing file
    #[arg(long)]
    no_verify: bool,

    /// Log progress to stderr (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).init();

    let db = OpenOptions::new()
        .create(!cli.no_create)
        .lock(!cli.no_lock)
        .verify(!cli.no_verify)
        .open(&cli.path)
        .with_context(|| format!("cannot open database {}", cli.path.display()))?;

    let header = db.header().context("cannot read database header")?;
    let size = db.size().context("cannot read database size")?;

    println!("{}: header {header}, {size} bytes", cli.path.display());
    Ok(())
}
