use crate::entry::Entry;
use crate::entry_attributes::RasMetadata;
use crate::entry_index::{Children, EntryId, EntryIndex};
use crate::error::{RasError, Result};
use crate::ext::io_ext::VecReadExt;
use crate::namespace::build_entries;
use crate::path_utils::canonicalize;
use crate::ras_cipher;
use crate::ras_config::RasConfig;
use crate::ras_file::RasFileStream;
use crate::ras_header::{ArchiveHeader, BaseInfo};
use crate::ras_table::{read_dir_records, read_file_records};
use crate::source::{ByteSource, FileSource};
use std::io::Read;
use std::path::Path;
use tracing::info;

/// An open RAS archive.
///
/// `RasArchive` is the main entry point of the crate. Opening an archive reads
/// and decrypts its tables once and builds an immutable index of every file
/// and directory; payload bytes are only read through the streams returned by
/// [`RasArchive::open_file`].
///
/// # Usage
///
/// ```no_run
/// use ras_rs::RasArchive;
/// use std::io::Read;
///
/// let archive = RasArchive::open_path("MaxPayne2.ras").unwrap();
///
/// for (name, entry) in archive.read_dir("").unwrap() {
///     println!("{name} ({} bytes)", entry.size());
/// }
///
/// let mut stream = archive.open_file("data/levels/level.txt").unwrap();
/// let mut contents = Vec::new();
/// stream.read_to_end(&mut contents).unwrap();
/// ```
///
/// # Thread Safety
///
/// The index is never modified after `open` returns. Every stream duplicates
/// the source, so a `RasArchive<FileSource>` can be shared between threads and
/// files opened from each of them.
///
/// # Paths
///
/// Query paths are canonicalized before lookup: `\` and `/` are both
/// separators, and leading, trailing or doubled separators are ignored.
/// `""` names the root directory.
#[derive(Debug)]
pub struct RasArchive<S: ByteSource> {
    source: S,
    header: ArchiveHeader,
    base_info: BaseInfo,
    index: EntryIndex,
    config: RasConfig,
}

impl RasArchive<FileSource> {
    /// Opens the archive file at `path` with the default configuration.
    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open(FileSource::open(path)?)
    }
}

impl<S: ByteSource> RasArchive<S> {
    /// Opens an archive with the default configuration.
    pub fn open(source: S) -> Result<Self> {
        Self::open_with_config(source, RasConfig::default())
    }

    /// Opens an archive, reading the source from its current position.
    ///
    /// Only the signature is read before deciding whether the input is a RAS
    /// archive at all. On any error the source is dropped along with
    /// everything parsed so far.
    pub fn open_with_config(mut source: S, config: RasConfig) -> Result<Self> {
        let header = ArchiveHeader::read(&mut source, config.accept_nul_signature)?;
        let base_info = BaseInfo::read(&mut source, header.seed)?;

        let file_block = Self::read_block(
            &mut source,
            base_info.file_info_len,
            header.seed,
            "file-info block",
        )?;
        let dir_block = Self::read_block(
            &mut source,
            base_info.dir_info_len,
            header.seed,
            "dir-info block",
        )?;

        let dirs = read_dir_records(&dir_block, base_info.dir_count, config.name_encoding)?;
        let files = read_file_records(
            &file_block,
            base_info.file_count,
            base_info.payload_start(),
            config.name_encoding,
        )?;

        let entries = build_entries(&dirs, &files, config.duplicate_policy)?;
        let index = EntryIndex::from_entries(entries)?;

        info!(
            files = index.files().count(),
            entries = index.len(),
            seed = header.seed,
            "Opened RAS archive"
        );

        Ok(Self {
            source,
            header,
            base_info,
            index,
            config,
        })
    }

    /// Reads one encrypted table block and decrypts it from the archive seed.
    fn read_block(source: &mut S, len: u32, seed: i32, what: &str) -> Result<Vec<u8>> {
        let len = usize::try_from(len).map_err(|_| RasError::OutOfMemory)?;
        let mut block = source
            .read_vec(len)
            .map_err(|e| RasError::from_table_read(e, what))?;
        ras_cipher::decrypt(&mut block, seed);
        Ok(block)
    }

    fn lookup(&self, path: &str) -> Result<&Entry> {
        let path = canonicalize(path);
        self.index.lookup(&path).ok_or(RasError::NotFound(path))
    }

    /// Opens a read-only stream over the file at `path`.
    ///
    /// Each call duplicates the source, so the returned stream is independent
    /// of the archive and of every other stream.
    pub fn open_file(&self, path: &str) -> Result<RasFileStream<S>> {
        let entry = self.lookup(path)?;
        if !entry.is_file() {
            return Err(RasError::NotAFile(entry.path.clone()));
        }
        Ok(RasFileStream::new(self.source.duplicate()?, entry.clone()))
    }

    /// Reads the whole payload of the file at `path`.
    pub fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let mut stream = self.open_file(path)?;
        let len = usize::try_from(stream.len()).map_err(|_| RasError::OutOfMemory)?;
        let mut contents = Vec::new();
        contents
            .try_reserve_exact(len)
            .map_err(|_| RasError::OutOfMemory)?;
        stream.read_to_end(&mut contents)?;
        if contents.len() < len {
            return Err(RasError::corrupt(format!(
                "payload of {} ends {} bytes early",
                stream.entry().path,
                len - contents.len()
            )));
        }
        Ok(contents)
    }

    /// Lists the immediate children of the directory at `path`.
    pub fn read_dir(&self, path: &str) -> Result<Children<'_>> {
        let path = canonicalize(path);
        if path.is_empty() {
            return Ok(self.index.children_of(EntryId::ROOT));
        }
        let id = self
            .index
            .lookup_id(&path)
            .ok_or_else(|| RasError::NotFound(path.clone()))?;
        match self.index.get(id) {
            Some(entry) if entry.is_dir() => Ok(self.index.children_of(id)),
            _ => Err(RasError::NotADirectory(path)),
        }
    }

    /// Kind, size and attributes of the entry at `path`. The root directory
    /// (`""`) always exists.
    pub fn stat(&self, path: &str) -> Result<RasMetadata> {
        if canonicalize(path).is_empty() {
            return Ok(RasMetadata::root());
        }
        self.lookup(path).map(RasMetadata::from)
    }

    pub fn exists(&self, path: &str) -> bool {
        let path = canonicalize(path);
        path.is_empty() || self.index.lookup(&path).is_some()
    }

    /// Every file and directory in the archive, excluding the root.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.index.iter()
    }

    pub fn files(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.index.files()
    }

    /// Files whose canonical path matches a shell-style pattern such as
    /// `"textures/*.dds"` or `"**/*.txt"`.
    pub fn glob(&self, pattern: &str) -> Result<Vec<&Entry>> {
        let pattern = glob::Pattern::new(&canonicalize(pattern))?;
        let options = glob::MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };
        Ok(self
            .index
            .files()
            .filter(|entry| pattern.matches_with(&entry.path, options))
            .collect())
    }

    pub fn entry_index(&self) -> &EntryIndex {
        &self.index
    }

    pub fn seed(&self) -> i32 {
        self.header.seed
    }

    pub fn header(&self) -> &ArchiveHeader {
        &self.header
    }

    pub fn base_info(&self) -> &BaseInfo {
        &self.base_info
    }

    pub fn config(&self) -> &RasConfig {
        &self.config
    }

    /// Archives cannot be written.
    pub fn open_write(&self, _path: &str) -> Result<RasFileStream<S>> {
        Err(RasError::ReadOnly)
    }

    /// Archives cannot be written.
    pub fn open_append(&self, _path: &str) -> Result<RasFileStream<S>> {
        Err(RasError::ReadOnly)
    }

    /// Archives cannot be modified.
    pub fn remove(&self, _path: &str) -> Result<()> {
        Err(RasError::ReadOnly)
    }

    /// Archives cannot be modified.
    pub fn create_dir(&self, _path: &str) -> Result<()> {
        Err(RasError::ReadOnly)
    }

    /// Releases the index and the source. Dropping the archive does the same.
    pub fn close(self) {}
}
