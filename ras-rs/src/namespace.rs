//! Turns flat directory and file records into namespace entries.

use crate::entry::Entry;
use crate::error::{RasError, Result};
use crate::path_utils::canonicalize;
use crate::ras_config::DuplicatePolicy;
use crate::ras_table::{DirRecord, FileRecord};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Full canonical path of a file record: its directory's name followed by
/// its own name.
pub fn file_path(dirs: &[DirRecord], file: &FileRecord) -> Result<String> {
    let dir = dirs.get(file.dir_index as usize).ok_or_else(|| {
        RasError::corrupt(format!(
            "file {} refers to directory {} of {}",
            file.name,
            file.dir_index,
            dirs.len()
        ))
    })?;
    let path = canonicalize(&format!("{}{}", dir.name, file.name));
    if path.is_empty() {
        return Err(RasError::corrupt("file record with an empty path"));
    }
    Ok(path)
}

/// Builds the entry list: declared directories first, then files, both in
/// declaration order.
///
/// Every path appears once. Repeated file paths are resolved by `policy`.
pub fn build_entries(
    dirs: &[DirRecord],
    files: &[FileRecord],
    policy: DuplicatePolicy,
) -> Result<Vec<Entry>> {
    let mut entries = Vec::with_capacity(dirs.len() + files.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for dir in dirs {
        let path = canonicalize(&dir.name);
        if path.is_empty() || positions.contains_key(&path) {
            continue;
        }
        positions.insert(path.clone(), entries.len());
        entries.push(Entry::new_directory(path));
    }

    for file in files {
        let path = file_path(dirs, file)?;
        let entry = Entry::new_file(path, file.offset, file.size, file.uncompressed_size);

        let Some(&position) = positions.get(&entry.path) else {
            positions.insert(entry.path.clone(), entries.len());
            entries.push(entry);
            continue;
        };

        let existing = &mut entries[position];
        if existing.is_dir() {
            return Err(RasError::corrupt(format!(
                "{} is a directory but is declared as a file",
                entry.path
            )));
        }
        match policy {
            DuplicatePolicy::LastWins => {
                debug!(
                    path = %entry.path,
                    old_offset = existing.offset,
                    new_offset = entry.offset,
                    "Later file record replaces earlier one"
                );
                *existing = entry;
            }
            DuplicatePolicy::FirstWins => {
                warn!(path = %entry.path, offset = entry.offset, "Ignoring repeated file record");
            }
            DuplicatePolicy::Reject => {
                return Err(RasError::corrupt(format!("duplicate file record {}", entry.path)));
            }
        }
    }

    Ok(entries)
}
