use crate::entry::Entry;
use crate::error::{RasError, Result};
use crate::source::ByteSource;
use std::io::{self, Read, Seek, SeekFrom, Write};

/// A read-only stream over one file's payload.
///
/// The stream owns its own handle onto the archive source, so several streams
/// (even for the same entry) can be read independently and from different
/// threads. Reads never go past the end of the entry, regardless of what
/// follows it in the archive.
#[derive(Debug)]
pub struct RasFileStream<S: ByteSource> {
    source: S,
    entry: Entry,
    /// Position relative to the start of the entry.
    position: u64,
}

impl<S: ByteSource> RasFileStream<S> {
    pub(crate) fn new(source: S, entry: Entry) -> Self {
        Self {
            source,
            entry,
            position: 0,
        }
    }

    /// The entry this stream reads.
    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    /// Length of the entry in bytes.
    pub fn len(&self) -> u64 {
        self.entry.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current position relative to the start of the entry.
    pub fn tell(&self) -> u64 {
        self.position
    }

    /// Bytes left before the end of the entry.
    pub fn remaining(&self) -> u64 {
        self.len().saturating_sub(self.position)
    }

    /// Moves to `offset` within the entry.
    ///
    /// The target must lie inside the entry (`offset < len`), so seeking to
    /// the end, or anywhere in an empty entry, is refused.
    pub fn seek_to(&mut self, offset: u64) -> Result<()> {
        if offset >= self.len() {
            return Err(RasError::PastEndOfFile {
                offset,
                len: self.len(),
            });
        }
        self.position = offset;
        Ok(())
    }

    /// Opens an independent stream over the same entry at the same position.
    pub fn duplicate(&self) -> Result<Self> {
        Ok(Self {
            source: self.source.duplicate()?,
            entry: self.entry.clone(),
            position: self.position,
        })
    }
}

impl<S: ByteSource> Read for RasFileStream<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.remaining();
        if remaining == 0 || buf.is_empty() {
            return Ok(0);
        }
        let n = usize::try_from(remaining).map_or(buf.len(), |r| r.min(buf.len()));

        self.source
            .seek(SeekFrom::Start(self.entry.offset + self.position))?;
        let read = self.source.read(&mut buf[..n])?;
        self.position += read as u64;
        Ok(read)
    }
}

impl<S: ByteSource> Seek for RasFileStream<S> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::Current(delta) => self.position.checked_add_signed(delta),
            SeekFrom::End(delta) => self.len().checked_add_signed(delta),
        }
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "Seek to a negative or overflowing position",
            )
        })?;

        self.seek_to(target)?;
        Ok(self.position)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.position)
    }
}

/// Archives are read-only; every write fails.
impl<S: ByteSource> Write for RasFileStream<S> {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(RasError::ReadOnly.into())
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(RasError::ReadOnly.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Entry `size` bytes long at offset 2 inside `0..=255`, so the byte
    /// after the entry exists in the source.
    fn stream(size: u32) -> RasFileStream<Cursor<Vec<u8>>> {
        let data: Vec<u8> = (0..=255).collect();
        RasFileStream::new(
            Cursor::new(data),
            Entry::new_file("f".into(), 2, size, size),
        )
    }

    #[test]
    fn seek_to_the_end_is_refused() {
        let mut s = stream(5);
        let err = s.seek_to(5).unwrap_err();
        assert!(matches!(err, RasError::PastEndOfFile { offset: 5, len: 5 }));
        assert_eq!(s.tell(), 0);
        s.seek_to(4).unwrap();
        assert_eq!(s.tell(), 4);
    }

    #[test]
    fn reads_are_clamped_to_the_entry() {
        let mut s = stream(5);
        s.seek_to(4).unwrap();
        let mut buf = [0u8; 16];
        let n = s.read(&mut buf).unwrap();
        assert_eq!(n, 1);
        assert_eq!(buf[0], 6);
        assert_eq!(s.read(&mut buf).unwrap(), 0);
        assert_eq!(s.remaining(), 0);
    }

    #[test]
    fn read_to_end_returns_the_payload() {
        let mut s = stream(5);
        let mut out = Vec::new();
        s.read_to_end(&mut out).unwrap();
        assert_eq!(out, vec![2, 3, 4, 5, 6]);
        assert_eq!(s.tell(), 5);
        let err = s.seek_to(5).unwrap_err();
        assert!(matches!(err, RasError::PastEndOfFile { offset: 5, len: 5 }));
        s.seek_to(0).unwrap();
        assert_eq!(s.tell(), 0);
    }

    #[test]
    fn empty_entries() {
        let mut s = stream(0);
        assert!(s.is_empty());
        let err = s.seek_to(0).unwrap_err();
        assert!(matches!(err, RasError::PastEndOfFile { offset: 0, len: 0 }));
        assert!(s.seek(SeekFrom::Start(0)).is_err());
        let mut buf = [0u8; 4];
        assert_eq!(s.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn std_seek_follows_the_same_rule() {
        let mut s = stream(5);
        assert_eq!(s.seek(SeekFrom::End(-1)).unwrap(), 4);
        assert_eq!(s.seek(SeekFrom::Current(-2)).unwrap(), 2);
        let err = s.seek(SeekFrom::End(0)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        let err = s.seek(SeekFrom::Current(-10)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert_eq!(s.stream_position().unwrap(), 2);
    }

    #[test]
    fn duplicates_keep_their_own_cursor() {
        let mut first = stream(5);
        first.seek_to(1).unwrap();
        let mut second = first.duplicate().unwrap();
        assert_eq!(second.tell(), 1);

        let mut buf = [0u8; 2];
        first.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [3, 4]);
        assert_eq!(second.tell(), 1);
        second.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [3, 4]);
    }

    #[test]
    fn writes_fail() {
        let mut s = stream(5);
        let err = s.write(b"x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert!(s.flush().is_err());
    }
}
