//! Comparison of two decoded snapshots.
//!
//! Entries are matched by `(type, path)`. A path whose type changed is a
//! removal plus an addition, never a modification. Matched entries are
//! modified when size, mtime or hash differ; for directories and symlinks
//! only mtime can differ since size and hash are always zero.

use crate::snapshot::format::{Entry, EntryType};
use crate::snapshot::reader::read_snapshot;
use crate::utils::errors::Result;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::info;

type Key<'a> = (EntryType, &'a str);

/// An entry present in both snapshots whose contents differ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modification {
    /// Entry in the baseline snapshot
    pub before: Entry,

    /// Entry in the candidate snapshot
    pub after: Entry,
}

impl Modification {
    pub fn hash_changed(&self) -> bool {
        self.before.hash != self.after.hash
    }

    pub fn size_changed(&self) -> bool {
        self.before.size != self.after.size
    }

    pub fn mtime_changed(&self) -> bool {
        self.before.mtime != self.after.mtime
    }
}

/// Result of comparing a baseline snapshot against a candidate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delta {
    /// In the candidate only, in candidate order
    pub added: Vec<Entry>,

    /// In the baseline only, in baseline order
    pub removed: Vec<Entry>,

    /// In both but different, in baseline order
    pub modified: Vec<Modification>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    /// Total number of reported changes
    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }
}

/// Index entries by key. A repeated key keeps its last entry.
fn index(entries: &[Entry]) -> HashMap<Key<'_>, &Entry> {
    entries.iter().map(|e| (e.key(), e)).collect()
}

/// Walk `entries` in order, yielding each distinct key once with the entry
/// the index resolved it to.
fn distinct<'a>(
    entries: &'a [Entry],
    index: &'a HashMap<Key<'a>, &'a Entry>,
) -> impl Iterator<Item = (Key<'a>, &'a Entry)> + 'a {
    let mut seen = HashSet::new();
    entries.iter().filter_map(move |e| {
        let key = e.key();
        if seen.insert(key) {
            index.get(&key).map(|resolved| (key, *resolved))
        } else {
            None
        }
    })
}

/// Compare baseline `a` against candidate `b`.
///
/// Runs in O(|a| + |b|) using hashed key lookups. Neither input is modified.
pub fn compare(a: &[Entry], b: &[Entry]) -> Delta {
    let index_a = index(a);
    let index_b = index(b);

    let mut delta = Delta::default();

    for (key, entry) in distinct(b, &index_b) {
        if !index_a.contains_key(&key) {
            delta.added.push(entry.clone());
        }
    }

    for (key, before) in distinct(a, &index_a) {
        match index_b.get(&key) {
            None => delta.removed.push(before.clone()),
            Some(after) => {
                if before.hash != after.hash
                    || before.size != after.size
                    || before.mtime != after.mtime
                {
                    delta.modified.push(Modification {
                        before: before.clone(),
                        after: (*after).clone(),
                    });
                }
            }
        }
    }

    delta
}

/// Read two snapshot files and compare them.
pub fn compare_snapshots(path_a: &Path, path_b: &Path) -> Result<Delta> {
    let entries_a = read_snapshot(path_a)?;
    let entries_b = read_snapshot(path_b)?;
    let delta = compare(&entries_a, &entries_b);

    info!(
        "Compared {} with {}: {} added, {} removed, {} modified",
        path_a.display(),
        path_b.display(),
        delta.added.len(),
        delta.removed.len(),
        delta.modified.len()
    );

    Ok(delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::format::{HASH_LEN, ZERO_HASH};

    fn baseline() -> Vec<Entry> {
        vec![
            Entry::directory("root", 100),
            Entry::file("root/a.txt", 3, 200, [1u8; HASH_LEN]),
            Entry::file("root/b.txt", 5, 300, [2u8; HASH_LEN]),
            Entry::symlink("root/link"),
            Entry::directory("root/sub", 400),
        ]
    }

    #[test]
    fn test_identical_inputs_give_empty_delta() {
        let delta = compare(&baseline(), &baseline());
        assert!(delta.is_empty());
        assert_eq!(delta.len(), 0);
    }

    #[test]
    fn test_order_does_not_matter() {
        let mut shuffled = baseline();
        shuffled.reverse();
        assert!(compare(&baseline(), &shuffled).is_empty());
    }

    #[test]
    fn test_added_and_removed() {
        let mut candidate = baseline();
        candidate.retain(|e| e.path != "root/b.txt");
        candidate.push(Entry::file("root/c.txt", 1, 500, [3u8; HASH_LEN]));

        let delta = compare(&baseline(), &candidate);
        assert_eq!(delta.added.len(), 1);
        assert_eq!(delta.added[0].path, "root/c.txt");
        assert_eq!(delta.removed.len(), 1);
        assert_eq!(delta.removed[0].path, "root/b.txt");
        assert!(delta.modified.is_empty());
    }

    #[test]
    fn test_content_change_with_same_size_and_mtime() {
        let mut candidate = baseline();
        candidate[1].hash = [7u8; HASH_LEN];

        let delta = compare(&baseline(), &candidate);
        assert!(delta.added.is_empty());
        assert!(delta.removed.is_empty());
        assert_eq!(delta.modified.len(), 1);

        let change = &delta.modified[0];
        assert_eq!(change.before.path, "root/a.txt");
        assert!(change.hash_changed());
        assert!(!change.size_changed());
        assert!(!change.mtime_changed());
    }

    #[test]
    fn test_directory_mtime_change_is_modification() {
        let mut candidate = baseline();
        candidate[4].mtime = 999;

        let delta = compare(&baseline(), &candidate);
        assert_eq!(delta.modified.len(), 1);
        assert_eq!(delta.modified[0].after.entry_type, EntryType::Directory);
        assert!(delta.modified[0].mtime_changed());
    }

    #[test]
    fn test_type_change_is_remove_plus_add() {
        let mut candidate = baseline();
        candidate[2] = Entry::directory("root/b.txt", 300);

        let delta = compare(&baseline(), &candidate);
        assert!(delta.modified.is_empty());
        assert_eq!(delta.removed, vec![Entry::file("root/b.txt", 5, 300, [2u8; HASH_LEN])]);
        assert_eq!(delta.added, vec![Entry::directory("root/b.txt", 300)]);
    }

    #[test]
    fn test_output_follows_input_order() {
        let a = vec![
            Entry::file("z", 1, 1, ZERO_HASH),
            Entry::file("m", 1, 1, ZERO_HASH),
            Entry::file("a", 1, 1, ZERO_HASH),
        ];
        let b = vec![
            Entry::file("y", 1, 1, ZERO_HASH),
            Entry::file("b", 1, 1, ZERO_HASH),
        ];

        let delta = compare(&a, &b);
        let removed: Vec<_> = delta.removed.iter().map(|e| e.path.as_str()).collect();
        let added: Vec<_> = delta.added.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(removed, vec!["z", "m", "a"]);
        assert_eq!(added, vec!["y", "b"]);
    }

    #[test]
    fn test_duplicate_keys_are_reported_once() {
        let a = vec![
            Entry::file("dup", 1, 1, ZERO_HASH),
            Entry::file("dup", 2, 1, ZERO_HASH),
        ];

        let delta = compare(&a, &[]);
        assert_eq!(delta.removed.len(), 1);
        assert_eq!(delta.removed[0].size, 2);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(compare(&[], &[]).is_empty());

        let delta = compare(&[], &baseline());
        assert_eq!(delta.added.len(), baseline().len());
        assert!(delta.removed.is_empty());
    }
}
