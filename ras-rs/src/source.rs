use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// A seekable byte source an archive can be opened from.
///
/// Every file stream owns its own duplicate of the source, so duplicates
/// must not share a cursor with the original.
pub trait ByteSource: Read + Seek + Send {
    /// Returns an independent handle onto the same bytes.
    fn duplicate(&self) -> io::Result<Self>
    where
        Self: Sized;
}

/// An archive file on disk.
///
/// Duplicates reopen the path instead of using `File::try_clone`, which would
/// share the OS-level file position between handles.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    file: File,
}

impl FileSource {
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Read for FileSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Seek for FileSource {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }
}

impl ByteSource for FileSource {
    fn duplicate(&self) -> io::Result<Self> {
        FileSource::open(&self.path)
    }
}

/// In-memory archives. Use a cheaply clonable buffer such as `Arc<[u8]>` or
/// `&'static [u8]` when many streams are opened.
impl<T> ByteSource for Cursor<T>
where
    T: AsRef<[u8]> + Clone + Send,
{
    fn duplicate(&self) -> io::Result<Self> {
        let mut copy = Cursor::new(self.get_ref().clone());
        copy.set_position(self.position());
        Ok(copy)
    }
}
