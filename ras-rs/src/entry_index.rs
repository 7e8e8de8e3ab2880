//! Lookup and traversal over the archive namespace.
//!
//! Entries live in an arena indexed by [`EntryId`]. Two derived indices sit on
//! top of it: a path → id map for exact lookup and, per entry, the ordered
//! list of its children. The root directory is always id 0, has the empty
//! path, and is not reachable through [`EntryIndex::lookup`].

use crate::entry::{Entry, EntryKind};
use crate::error::{RasError, Result};
use crate::path_utils::split_parent;
use std::collections::HashMap;
use std::iter::FusedIterator;

/// Stable handle to an entry inside an [`EntryIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(usize);

impl EntryId {
    /// The implicit root directory.
    pub const ROOT: EntryId = EntryId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct EntryIndex {
    entries: Vec<Entry>,
    parents: Vec<Option<EntryId>>,
    children: Vec<Vec<EntryId>>,
    by_path: HashMap<String, EntryId>,
}

impl Default for EntryIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryIndex {
    /// Creates an index holding only the root directory.
    pub fn new() -> Self {
        Self {
            entries: vec![Entry::new_directory(String::new())],
            parents: vec![None],
            children: vec![Vec::new()],
            by_path: HashMap::new(),
        }
    }

    /// Builds an index from entries with canonical paths.
    ///
    /// Missing ancestors are synthesized. A file path seen twice keeps a
    /// single entry whose range is taken from the later one.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = Entry>,
    {
        let mut index = Self::new();
        for entry in entries {
            match entry.kind {
                EntryKind::Directory => {
                    index.find_or_create_dir(&entry.path)?;
                }
                EntryKind::File => {
                    index.insert_file(entry)?;
                }
            }
        }
        Ok(index)
    }

    fn push(&mut self, entry: Entry, parent: EntryId) -> EntryId {
        let id = EntryId(self.entries.len());
        self.by_path.insert(entry.path.clone(), id);
        self.entries.push(entry);
        self.parents.push(Some(parent));
        self.children.push(Vec::new());
        self.children[parent.0].push(id);
        id
    }

    /// Returns the directory at `path`, creating it and any missing ancestors.
    ///
    /// Calling this repeatedly for the same path yields the same id. Walks
    /// up to the nearest existing ancestor iteratively, so path depth is
    /// bounded by memory rather than stack.
    pub fn find_or_create_dir(&mut self, path: &str) -> Result<EntryId> {
        let mut missing = Vec::new();
        let mut current = path;
        let mut parent = EntryId::ROOT;
        while !current.is_empty() {
            if let Some(&id) = self.by_path.get(current) {
                if self.entries[id.0].is_file() {
                    return Err(RasError::corrupt(format!(
                        "{current} is a file but is used as a directory"
                    )));
                }
                parent = id;
                break;
            }
            missing.push(current);
            current = split_parent(current).0;
        }

        for dir in missing.into_iter().rev() {
            parent = self.push(Entry::new_directory(dir.to_string()), parent);
        }
        Ok(parent)
    }

    /// Inserts a file entry, or updates the range of an existing file with
    /// the same path.
    pub fn insert_file(&mut self, entry: Entry) -> Result<EntryId> {
        debug_assert!(entry.is_file());
        if entry.path.is_empty() {
            return Err(RasError::corrupt("file record with an empty path"));
        }
        if let Some(&id) = self.by_path.get(entry.path.as_str()) {
            let existing = &mut self.entries[id.0];
            if existing.is_dir() {
                return Err(RasError::corrupt(format!(
                    "{} is a directory but is declared as a file",
                    entry.path
                )));
            }
            existing.offset = entry.offset;
            existing.compressed_size = entry.compressed_size;
            existing.uncompressed_size = entry.uncompressed_size;
            return Ok(id);
        }

        let (parent_path, _) = split_parent(&entry.path);
        let parent = self.find_or_create_dir(parent_path)?;
        Ok(self.push(entry, parent))
    }

    /// Exact lookup of a canonical path. The root is never returned.
    pub fn lookup(&self, path: &str) -> Option<&Entry> {
        self.lookup_id(path).map(|id| &self.entries[id.0])
    }

    pub fn lookup_id(&self, path: &str) -> Option<EntryId> {
        self.by_path.get(path).copied()
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.get(id.0)
    }

    pub fn root(&self) -> &Entry {
        &self.entries[EntryId::ROOT.0]
    }

    pub fn parent(&self, id: EntryId) -> Option<EntryId> {
        self.parents.get(id.0).copied().flatten()
    }

    /// Immediate children of the directory at `dir_path`; `""` is the root.
    ///
    /// Returns `None` if the path does not exist or names a file.
    pub fn children(&self, dir_path: &str) -> Option<Children<'_>> {
        let id = if dir_path.is_empty() {
            EntryId::ROOT
        } else {
            self.lookup_id(dir_path)?
        };
        if !self.entries[id.0].is_dir() {
            return None;
        }
        Some(self.children_of(id))
    }

    /// Immediate children of `id` in insertion order. Empty for files.
    pub fn children_of(&self, id: EntryId) -> Children<'_> {
        let ids = self.children.get(id.0).map(Vec::as_slice).unwrap_or(&[]);
        Children {
            ids: ids.iter(),
            entries: &self.entries,
        }
    }

    /// Number of entries, excluding the root.
    pub fn len(&self) -> usize {
        self.entries.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entries except the root, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.entries.iter().skip(1)
    }

    pub fn files(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.iter().filter(|entry| entry.is_file())
    }
}

/// Iterator over `(local_name, entry)` pairs of a directory's children.
///
/// Clone it before consuming, or call [`EntryIndex::children`] again, to
/// enumerate the same children a second time.
#[derive(Debug, Clone)]
pub struct Children<'a> {
    ids: std::slice::Iter<'a, EntryId>,
    entries: &'a [Entry],
}

impl<'a> Iterator for Children<'a> {
    type Item = (&'a str, &'a Entry);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.ids.next()?;
        let entry = &self.entries[id.0];
        Some((entry.name(), entry))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl ExactSizeIterator for Children<'_> {}

impl FusedIterator for Children<'_> {}
