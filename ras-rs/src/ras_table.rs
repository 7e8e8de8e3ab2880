//! Parsing of the decrypted file-info and dir-info blocks.
//!
//! Both blocks are sequences of NUL-terminated names, each followed by a
//! fixed-size trailer. Only a few trailer fields are understood; the rest
//! are skipped as opaque padding.

use crate::error::{RasError, Result};
use crate::ext::io_ext::{ReadExt, SeekExt};
use crate::path_utils::normalize_dir_name;
use crate::ras_config::NameEncoding;
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;
use tracing::trace;

/// Trailer after each directory name: one u32 and six u16, all opaque.
pub const DIR_TRAILER_LEN: usize = 4 + 6 * 2;
/// Trailer after each file name: seven u32 and six u16.
pub const FILE_TRAILER_LEN: usize = 7 * 4 + 6 * 2;

/// A directory record from the dir-info block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirRecord {
    /// Name with the leading `\` stripped and `\` turned into `/`.
    pub name: String,
    /// Length of the raw name in bytes.
    pub name_len: u32,
}

/// A file record from the file-info block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub name: String,
    /// Length of the raw name in bytes.
    pub name_len: u32,
    pub uncompressed_size: u32,
    /// Stored payload length.
    pub size: u32,
    /// Position of the owning record in the dir-info block.
    pub dir_index: u32,
    /// Absolute payload offset, derived from the record order.
    pub offset: u64,
}

fn decode_name(raw: Vec<u8>, encoding: NameEncoding) -> Result<String> {
    match encoding {
        NameEncoding::Lossy => Ok(match String::from_utf8(raw) {
            Ok(name) => name,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }),
        NameEncoding::Strict => String::from_utf8(raw).map_err(|e| {
            RasError::corrupt(format!(
                "name is not valid UTF-8 ({})",
                hex::encode(e.as_bytes())
            ))
        }),
    }
}

fn read_name(cursor: &mut Cursor<&[u8]>, what: &str) -> Result<(Vec<u8>, u32)> {
    let raw = cursor
        .read_cstring_bytes()
        .map_err(|e| RasError::from_table_read(e, &format!("{what} name")))?;
    let len = u32::try_from(raw.len())
        .map_err(|_| RasError::corrupt(format!("{what} name is too long")))?;
    Ok((raw, len))
}

/// Makes sure `len` more bytes are available before skipping them; seeking a
/// cursor past its end would otherwise succeed silently.
fn ensure_remaining(cursor: &Cursor<&[u8]>, len: usize, what: &str) -> Result<()> {
    let remaining = (cursor.get_ref().len() as u64).saturating_sub(cursor.position());
    if remaining < len as u64 {
        return Err(RasError::corrupt(format!("truncated {what} record")));
    }
    Ok(())
}

/// Upper bound on how many records of the given trailer size fit in `block`,
/// so a corrupt count cannot drive the allocation.
fn max_records(block: &[u8], count: u32, trailer_len: usize) -> usize {
    (count as usize).min(block.len() / (trailer_len + 1))
}

fn log_trailing_bytes(cursor: &Cursor<&[u8]>, what: &str) {
    let used = cursor.position();
    let total = cursor.get_ref().len() as u64;
    if used < total {
        trace!("{} unused bytes after the last {what} record", total - used);
    }
}

/// Parses `count` directory records from the decrypted dir-info block.
pub fn read_dir_records(block: &[u8], count: u32, encoding: NameEncoding) -> Result<Vec<DirRecord>> {
    let mut cursor = Cursor::new(block);
    let mut dirs = Vec::with_capacity(max_records(block, count, DIR_TRAILER_LEN));

    for index in 0..count {
        let (raw, name_len) = read_name(&mut cursor, "directory")?;
        ensure_remaining(&cursor, DIR_TRAILER_LEN, "directory")?;
        cursor.skip(DIR_TRAILER_LEN)?;

        let name = normalize_dir_name(&decode_name(raw, encoding)?);
        trace!(index, name = %name, "Read directory record");
        dirs.push(DirRecord { name, name_len });
    }
    log_trailing_bytes(&cursor, "directory");
    Ok(dirs)
}

/// Parses `count` file records from the decrypted file-info block.
///
/// Payloads tile the archive in record order, so each record's offset is the
/// previous record's offset plus its size, starting at `payload_start`.
pub fn read_file_records(
    block: &[u8],
    count: u32,
    payload_start: u64,
    encoding: NameEncoding,
) -> Result<Vec<FileRecord>> {
    let mut cursor = Cursor::new(block);
    let mut files = Vec::with_capacity(max_records(block, count, FILE_TRAILER_LEN));

    let mut offset = payload_start;
    for index in 0..count {
        let (raw, name_len) = read_name(&mut cursor, "file")?;
        ensure_remaining(&cursor, FILE_TRAILER_LEN, "file")?;

        let uncompressed_size = cursor.read_u32::<LittleEndian>()?;
        let size = cursor.read_u32::<LittleEndian>()?;
        cursor.skip(4)?;
        let dir_index = cursor.read_u32::<LittleEndian>()?;
        cursor.skip(FILE_TRAILER_LEN - 16)?;

        let name = decode_name(raw, encoding)?;
        trace!(index, name = %name, size, dir_index, offset, "Read file record");
        files.push(FileRecord {
            name,
            name_len,
            uncompressed_size,
            size,
            dir_index,
            offset,
        });
        offset += u64::from(size);
    }
    log_trailing_bytes(&cursor, "file");
    Ok(files)
}
