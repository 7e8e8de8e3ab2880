/// Whether an entry is a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

/// A file or directory in the archive namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Canonical path, `/`-separated, no leading or trailing separator.
    pub path: String,
    pub kind: EntryKind,
    /// Absolute offset of the payload within the archive. Zero for directories.
    pub offset: u64,
    /// Payload length as stored. Zero for directories.
    pub compressed_size: u32,
    /// Declared uncompressed length. Zero for directories.
    pub uncompressed_size: u32,
}

impl Entry {
    pub fn new_file(path: String, offset: u64, compressed_size: u32, uncompressed_size: u32) -> Self {
        Self {
            path,
            kind: EntryKind::File,
            offset,
            compressed_size,
            uncompressed_size,
        }
    }

    pub fn new_directory(path: String) -> Self {
        Self {
            path,
            kind: EntryKind::Directory,
            offset: 0,
            compressed_size: 0,
            uncompressed_size: 0,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// The final path segment.
    pub fn name(&self) -> &str {
        crate::path_utils::split_parent(&self.path).1
    }

    /// Size reported for the entry: the stored payload length.
    pub fn size(&self) -> u64 {
        u64::from(self.compressed_size)
    }
}
