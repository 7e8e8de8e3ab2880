//! Plaintext archive header and the encrypted base info that follows it.

use crate::error::{RasError, Result};
use crate::ext::io_ext::SeekExt;
use crate::ras_cipher;
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{self, Cursor, Read};
use tracing::debug;

/// `"RAS "` read as a little-endian u32.
pub const RAS_SIGNATURE: u32 = u32::from_le_bytes(*b"RAS ");
/// `"RAS\0"`, the NUL-padded variant of the tag some loaders check for.
pub const RAS_SIGNATURE_NUL: u32 = u32::from_le_bytes(*b"RAS\0");
/// Size of the signature, seed and encrypted base info.
pub const HEADER_LEN: u64 = 44;
/// Size of the encrypted base info block.
pub const BASE_INFO_LEN: usize = 36;

/// The plaintext header at the start of every archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveHeader {
    pub signature: u32,
    /// Seed for every encrypted block in the archive.
    pub seed: i32,
}

impl ArchiveHeader {
    /// Reads the signature and seed.
    ///
    /// The signature is validated before the seed is read, so non-RAS input
    /// costs exactly four bytes. Input shorter than four bytes is also
    /// reported as `UnsupportedFormat`.
    pub fn read<R: Read>(reader: &mut R, accept_nul_signature: bool) -> Result<Self> {
        let mut tag = [0u8; 4];
        reader.read_exact(&mut tag).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => RasError::UnsupportedFormat(hex::encode(&tag)),
            _ => RasError::from(e),
        })?;

        let signature = u32::from_le_bytes(tag);
        let valid = signature == RAS_SIGNATURE
            || (accept_nul_signature && signature == RAS_SIGNATURE_NUL);
        if !valid {
            return Err(RasError::UnsupportedFormat(hex::encode(tag)));
        }

        let seed = reader
            .read_i32::<LittleEndian>()
            .map_err(|e| RasError::from_table_read(e, "archive header"))?;

        Ok(Self { signature, seed })
    }
}

/// Decrypted base info: record counts and table block lengths.
///
/// The five trailing words are not understood and are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseInfo {
    pub file_count: u32,
    pub dir_count: u32,
    pub file_info_len: u32,
    pub dir_info_len: u32,
}

impl BaseInfo {
    /// Reads and decrypts the base info block.
    pub fn read<R: Read>(reader: &mut R, seed: i32) -> Result<Self> {
        let mut raw = [0u8; BASE_INFO_LEN];
        reader
            .read_exact(&mut raw)
            .map_err(|e| RasError::from_table_read(e, "base info"))?;
        ras_cipher::decrypt(&mut raw, seed);
        Self::parse(&raw)
    }

    /// Parses an already decrypted base info block.
    pub fn parse(raw: &[u8; BASE_INFO_LEN]) -> Result<Self> {
        let mut cursor = Cursor::new(&raw[..]);
        let info = Self::parse_fields(&mut cursor).map_err(RasError::from)?;
        debug!(
            file_count = info.file_count,
            dir_count = info.dir_count,
            file_info_len = info.file_info_len,
            dir_info_len = info.dir_info_len,
            "Read RAS base info"
        );
        Ok(info)
    }

    fn parse_fields(cursor: &mut Cursor<&[u8]>) -> io::Result<Self> {
        let info = Self {
            file_count: cursor.read_u32::<LittleEndian>()?,
            dir_count: cursor.read_u32::<LittleEndian>()?,
            file_info_len: cursor.read_u32::<LittleEndian>()?,
            dir_info_len: cursor.read_u32::<LittleEndian>()?,
        };
        cursor.skip(5 * std::mem::size_of::<u32>())?;
        Ok(info)
    }

    /// Offset of the first payload byte: right after both table blocks.
    pub fn payload_start(&self) -> u64 {
        HEADER_LEN + u64::from(self.file_info_len) + u64::from(self.dir_info_len)
    }
}
