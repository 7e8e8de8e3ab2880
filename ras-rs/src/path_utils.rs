//! Canonical path handling for archive entries.
//!
//! Stored paths use `/` as the only separator and never start or end with
//! one. Empty segments are dropped. `.` and `..` have no special meaning.

/// Canonicalizes a path: `\` becomes `/`, empty segments are removed.
pub fn canonicalize(path: &str) -> String {
    let mut canonical = String::with_capacity(path.len());
    for segment in path.split(['/', '\\']).filter(|s| !s.is_empty()) {
        if !canonical.is_empty() {
            canonical.push('/');
        }
        canonical.push_str(segment);
    }
    canonical
}

/// Normalizes a directory record name: one leading `\` is stripped and the
/// remaining `\` separators become `/`. Trailing separators are kept, so the
/// result can be concatenated with a file name.
pub fn normalize_dir_name(name: &str) -> String {
    name.strip_prefix('\\').unwrap_or(name).replace('\\', "/")
}

/// Splits a canonical path into its parent path and final segment.
///
/// Top-level entries have the root (`""`) as their parent.
pub fn split_parent(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(pos) => (&path[..pos], &path[pos + 1..]),
        None => ("", path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn canonicalizes_separators() {
        assert_eq!(canonicalize("lvl1/data.bin"), "lvl1/data.bin");
        assert_eq!(canonicalize("\\lvl1\\data.bin"), "lvl1/data.bin");
        assert_eq!(canonicalize("/a//b/"), "a/b");
        assert_eq!(canonicalize(""), "");
        assert_eq!(canonicalize("\\"), "");
    }

    #[test]
    fn dot_segments_are_literal() {
        assert_eq!(canonicalize("a/./b/../c"), "a/./b/../c");
    }

    #[test]
    fn normalizes_directory_names() {
        assert_eq!(normalize_dir_name("\\maps\\lvl1\\"), "maps/lvl1/");
        assert_eq!(normalize_dir_name("lvl1/"), "lvl1/");
        assert_eq!(normalize_dir_name("\\"), "");
        assert_eq!(normalize_dir_name("\\\\x"), "/x");
    }

    #[test]
    fn splits_parent() {
        assert_eq!(split_parent("a/b/c.txt"), ("a/b", "c.txt"));
        assert_eq!(split_parent("c.txt"), ("", "c.txt"));
    }

    proptest! {
        #[test]
        fn canonicalize_is_idempotent(path in "[a-z/\\\\.]{0,24}") {
            let once = canonicalize(&path);
            prop_assert_eq!(canonicalize(&once), once.clone());
            prop_assert!(!once.starts_with('/'));
            prop_assert!(!once.ends_with('/'));
            prop_assert!(!once.contains("//"));
            prop_assert!(!once.contains('\\'));
        }
    }
}
