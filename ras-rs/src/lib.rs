//! # ras-rs
//!
//! `ras-rs` is a pure Rust reader for the RAS archives shipped with Max Payne 2.
//! It authenticates the container, decrypts its record tables, rebuilds the
//! directory tree and gives bounded, seekable access to the stored files.
//!
//! ## Features
//! - Open archives from disk or from any in-memory buffer
//! - Look up, stat and list files and directories
//! - Read file payloads through independent `Read + Seek` streams
//! - Glob over archive paths
//! - The archive cipher in both directions
//!
//! ## Usage
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! ras-rs = "0.1"
//! ```
//!
//! ### Example: Listing and Extracting Files
//! ```no_run
//! use ras_rs::RasArchive;
//! use std::fs::File;
//!
//! let archive = RasArchive::open_path("MaxPayne2.ras").unwrap();
//!
//! // List all files
//! for entry in archive.files() {
//!     println!("File: {} ({} bytes)", entry.path, entry.size());
//! }
//!
//! // Extract a file by name
//! let mut stream = archive.open_file("data/database/init.txt").unwrap();
//! let mut output = File::create("init.txt").unwrap();
//! std::io::copy(&mut stream, &mut output).unwrap();
//! ```
//!
//! Payloads are returned exactly as stored. Entries flagged as compressed in
//! the game data are not inflated.

pub mod entry;
pub mod entry_attributes;
pub mod entry_index;
pub mod error;
mod ext;
pub mod namespace;
pub mod path_utils;
pub mod ras_archive;
pub mod ras_cipher;
pub mod ras_config;
pub mod ras_file;
pub mod ras_header;
pub mod ras_table;
pub mod source;

pub use entry::{Entry, EntryKind};
pub use entry_attributes::{EntryAttributes, RasMetadata};
pub use entry_index::{Children, EntryId, EntryIndex};
pub use error::{RasError, Result};
pub use ras_archive::RasArchive;
pub use ras_config::{DuplicatePolicy, NameEncoding, RasConfig};
pub use ras_file::RasFileStream;
pub use ras_header::{BASE_INFO_LEN, HEADER_LEN, RAS_SIGNATURE, RAS_SIGNATURE_NUL};
pub use source::{ByteSource, FileSource};

/// File extension of RAS archives.
pub const EXTENSION: &str = "RAS";
/// Human-readable name of the archive format.
pub const DESCRIPTION: &str = "Max Payne 2 format";
