use std::io;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;

pub trait ReadExt: Read {
    /// Reads bytes up to (and consuming) the next NUL terminator.
    ///
    /// Fails with `UnexpectedEof` when the data ends before a terminator is
    /// found; the partial name is never returned.
    fn read_cstring_bytes(&mut self) -> io::Result<Vec<u8>>;
}

impl<T> ReadExt for T
where
    T: io::BufRead,
{
    fn read_cstring_bytes(&mut self) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.read_until(0, &mut bytes)?;
        match bytes.pop() {
            Some(0) => Ok(bytes),
            _ => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Missing NUL terminator",
            )),
        }
    }
}

/// A trait that reads byte arrays from any `Read` type.
pub trait VecReadExt: Read {
    /// Reads exactly `length` bytes into a freshly allocated buffer.
    ///
    /// The allocation is fallible so a corrupt length reports `OutOfMemory`
    /// instead of aborting the process.
    fn read_vec(&mut self, length: usize) -> io::Result<Vec<u8>>;
}

impl<T> VecReadExt for T
where
    T: Read,
{
    fn read_vec(&mut self, length: usize) -> io::Result<Vec<u8>> {
        let mut result: Vec<u8> = Vec::new();

        result
            .try_reserve_exact(length)
            .map_err(|e| io::Error::new(io::ErrorKind::OutOfMemory, e))?;
        result.resize(length, 0);

        self.read_exact(&mut result)?;

        Ok(result)
    }
}

/// Utility methods for working with seekable streams.
pub trait SeekExt: Seek {
    /// Skips over the given number of bytes from the current position.
    fn skip<P: Copy + 'static>(&mut self, size: P) -> io::Result<u64>
    where
        u64: TryFrom<P>;
}

impl<T> SeekExt for T
where
    T: Seek,
{
    fn skip<P: Copy + 'static>(&mut self, size: P) -> io::Result<u64>
    where
        u64: TryFrom<P>,
    {
        let size = u64::try_from(size).map_err(|_| io::Error::from(io::ErrorKind::InvalidData))?;
        let size = i64::try_from(size).map_err(|_| io::Error::from(io::ErrorKind::InvalidData))?;

        self.seek(SeekFrom::Current(size))
    }
}
