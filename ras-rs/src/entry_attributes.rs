use crate::entry::{Entry, EntryKind};
use bitflags::bitflags;

bitflags! {
    /// Attribute flags reported by `stat`.
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EntryAttributes: u32 {
        /// Set on every entry; the archive cannot be modified.
        const READ_ONLY = 0x0001;
        const DIRECTORY = 0x0010;
    }
}

/// Result of a `stat` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasMetadata {
    pub kind: EntryKind,
    /// Stored payload length. No decompression happens at this layer, so this
    /// is what a reader of the file stream will receive.
    pub size: u64,
    pub attributes: EntryAttributes,
}

impl RasMetadata {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_read_only(&self) -> bool {
        self.attributes.contains(EntryAttributes::READ_ONLY)
    }

    pub(crate) fn root() -> Self {
        Self {
            kind: EntryKind::Directory,
            size: 0,
            attributes: EntryAttributes::READ_ONLY | EntryAttributes::DIRECTORY,
        }
    }
}

impl From<&Entry> for RasMetadata {
    fn from(entry: &Entry) -> Self {
        let mut attributes = EntryAttributes::READ_ONLY;
        if entry.is_dir() {
            attributes |= EntryAttributes::DIRECTORY;
        }
        Self {
            kind: entry.kind,
            size: entry.size(),
            attributes,
        }
    }
}
