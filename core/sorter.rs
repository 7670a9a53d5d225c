use crate::gather::Entry;
use std::cmp::Ordering;

/// Ordering policy shared by both walkers.
pub struct Sorter;

impl Sorter {
    /// Directories first, then names compared case-insensitively; equal
    /// folds fall back to byte order so the result never depends on input
    /// order.
    pub fn compare_siblings(a: &Entry, b: &Entry) -> Ordering {
        b.is_dir
            .cmp(&a.is_dir)
            .then_with(|| compare_folded(&a.name, &b.name))
    }

    pub fn sort_siblings(entries: &mut [Entry]) {
        entries.sort_by(Self::compare_siblings);
    }

    /// Case-insensitive order of forward-slash relative paths.
    pub fn compare_paths(a: &str, b: &str) -> Ordering {
        compare_folded(a, b)
    }

    pub fn sort_flat<T, F>(items: &mut [T], key: F)
    where
        F: Fn(&T) -> &str,
    {
        items.sort_by(|a, b| Self::compare_paths(key(a), key(b)));
    }
}

fn compare_folded(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
